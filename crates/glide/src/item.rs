use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

/// Display color as written in the catalog, e.g. `#3584e4`. Parsing is left to the renderer.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemColor(String);

crate::impl_string_newtype!(ItemColor);

pub type Action = Rc<dyn Fn()>;
pub type SelectHandler = Rc<dyn Fn(&[&RadialItem])>;

#[derive(Clone)]
pub struct RadialItem {
    pub id: ItemId,
    pub label: String,
    pub children: Vec<RadialItem>,
    pub color: Option<ItemColor>,
    pub action: Option<Action>,
    pub on_select: Option<SelectHandler>,
}

impl RadialItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            label: label.into(),
            children: Vec::new(),
            color: None,
            action: None,
            on_select: None,
        }
    }

    pub fn with_children(mut self, children: Vec<RadialItem>) -> Self {
        self.children = children;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(ItemColor::new(color));
        self
    }

    pub fn with_action(mut self, action: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Called on confirmation with the items from the root ring down to this leaf.
    pub fn with_on_select(mut self, handler: impl Fn(&[&RadialItem]) + 'static) -> Self {
        self.on_select = Some(Rc::new(handler));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_branch(&self) -> bool {
        !self.is_leaf()
    }
}

impl fmt::Debug for RadialItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadialItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("color", &self.color)
            .field("children", &self.children)
            .field("action", &self.action.is_some())
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

pub fn item_at<'a>(items: &'a [RadialItem], path: &[usize]) -> Option<&'a RadialItem> {
    let (last, prefix) = path.split_last()?;
    children_at(items, prefix)?.get(*last)
}

pub fn children_at<'a>(items: &'a [RadialItem], prefix: &[usize]) -> Option<&'a [RadialItem]> {
    prefix.iter().try_fold(items, |level, &index| {
        level.get(index).map(|item| item.children.as_slice())
    })
}

pub fn items_along<'a>(items: &'a [RadialItem], path: &[usize]) -> Option<Vec<&'a RadialItem>> {
    let mut level = items;
    let mut chain = Vec::with_capacity(path.len());
    for &index in path {
        let item = level.get(index)?;
        chain.push(item);
        level = &item.children;
    }
    Some(chain)
}

pub fn valid_prefix_len(items: &[RadialItem], path: &[usize]) -> usize {
    let mut level = items;
    for (depth, &index) in path.iter().enumerate() {
        match level.get(index) {
            Some(item) => level = &item.children,
            None => return depth,
        }
    }
    path.len()
}

pub fn max_depth(items: &[RadialItem]) -> usize {
    items
        .iter()
        .map(|item| 1 + max_depth(&item.children))
        .max()
        .unwrap_or(0)
}
