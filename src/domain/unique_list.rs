use super::{Bike, Loan, bike::is_same_bike};

/// 一意性の判定基準
pub trait UniqueEntry {
    /// 同じ一覧に共存できないか
    fn collides_with(&self, other: &Self) -> bool;
}

impl UniqueEntry for Bike {
    fn collides_with(&self, other: &Self) -> bool {
        is_same_bike(self, other)
    }
}

/// 完全一致、またはIDの共有で衝突とみなす
impl UniqueEntry for Loan {
    fn collides_with(&self, other: &Self) -> bool {
        self == other || self.id == other.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueListError {
    Duplicate,
    NotFound,
}

/// 要素の一意性を保証する一覧
///
/// 挿入順を保持する。失敗した操作は一覧を変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: UniqueEntry + PartialEq> UniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 一覧を一括で作成する。重複があれば最初の重複要素を返す。
    pub fn from_vec(items: Vec<T>) -> Result<Self, T> {
        let mut list = Self::new();
        for item in items {
            if list.contains(&item) {
                return Err(item);
            }
            list.items.push(item);
        }
        Ok(list)
    }

    /// 衝突する要素が存在するか
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing.collides_with(item))
    }

    pub fn add(&mut self, item: T) -> Result<(), UniqueListError> {
        if self.contains(&item) {
            return Err(UniqueListError::Duplicate);
        }
        self.items.push(item);
        Ok(())
    }

    /// `target`（完全一致）を`replacement`で置き換える
    ///
    /// `replacement`が`target`以外の要素と衝突する場合は失敗する。
    pub fn set(&mut self, target: &T, replacement: T) -> Result<(), UniqueListError> {
        let index = self
            .items
            .iter()
            .position(|existing| existing == target)
            .ok_or(UniqueListError::NotFound)?;

        let collides_with_other = self
            .items
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.collides_with(&replacement));
        if collides_with_other {
            return Err(UniqueListError::Duplicate);
        }

        self.items[index] = replacement;
        Ok(())
    }

    /// `target`（完全一致）を削除する
    pub fn remove(&mut self, target: &T) -> Result<T, UniqueListError> {
        let index = self
            .items
            .iter()
            .position(|existing| existing == target)
            .ok_or(UniqueListError::NotFound)?;
        Ok(self.items.remove(index))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
