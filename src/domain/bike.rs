use serde::{Deserialize, Serialize};

use super::{BikeStatus, Name};

/// 自転車 - 名前で識別される
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bike {
    pub name: Name,
    #[serde(default)]
    pub status: BikeStatus,
}

impl Bike {
    /// 貸出可能状態で作成
    pub fn new(name: Name) -> Self {
        Self {
            name,
            status: BikeStatus::Available,
        }
    }
}

/// 同一の自転車か（名前のみで比較）
///
/// 全フィールドの比較は`==`を使う。
pub fn is_same_bike(a: &Bike, b: &Bike) -> bool {
    a.name == b.name
}
