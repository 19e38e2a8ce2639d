use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuStatus {
    #[default]
    Closed,
    Open,
    Gliding,
    AnimatingOut,
}

impl MenuStatus {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Open | Self::Gliding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MenuState {
    pub status: MenuStatus,
    pub active_path: Vec<usize>,
    pub selection: Option<Vec<usize>>,
}

type Listener = Rc<dyn Fn(&MenuState)>;

#[derive(Default)]
struct Inner {
    state: RefCell<MenuState>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    pending: RefCell<VecDeque<MenuState>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

/// Owner of the authoritative [`MenuState`].
///
/// Setters compare by value and skip both the write and the notification
/// when nothing changes. Listeners run synchronously in subscription order.
/// A setter called from inside a listener queues its snapshot; the queue is
/// drained in call order by the outermost dispatch, so nesting never
/// recurses. Every listener sees every snapshot, including one that
/// unsubscribes mid-dispatch for the snapshot being delivered.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Rc<Inner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MenuState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> MenuStatus {
        self.inner.state.borrow().status
    }

    pub(crate) fn active_path(&self) -> Vec<usize> {
        self.inner.state.borrow().active_path.clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&MenuState) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn set_status(&self, status: MenuStatus) -> bool {
        self.update(|state| {
            if state.status == status {
                return false;
            }
            state.status = status;
            true
        })
    }

    pub fn set_active_path(&self, path: &[usize]) -> bool {
        self.update(|state| {
            if state.active_path == path {
                return false;
            }
            state.active_path = path.to_vec();
            true
        })
    }

    pub fn set_selection(&self, selection: Option<&[usize]>) -> bool {
        self.update(|state| {
            if state.selection.as_deref() == selection {
                return false;
            }
            state.selection = selection.map(<[usize]>::to_vec);
            true
        })
    }

    pub fn reset(&self) -> bool {
        self.update(|state| {
            if *state == MenuState::default() {
                return false;
            }
            *state = MenuState::default();
            true
        })
    }

    fn update(&self, apply: impl FnOnce(&mut MenuState) -> bool) -> bool {
        let changed = apply(&mut self.inner.state.borrow_mut());
        if changed {
            let snapshot = self.state();
            self.notify(snapshot);
        }
        changed
    }

    fn notify(&self, snapshot: MenuState) {
        self.inner.pending.borrow_mut().push_back(snapshot);
        if self.inner.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(&self.inner);

        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(snapshot) = next else { break };
            let listeners: Vec<Listener> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(&snapshot);
            }
        }
    }
}

struct DispatchGuard<'a>(&'a Inner);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.dispatching.set(false);
        self.0.pending.borrow_mut().clear();
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    store: Weak<Inner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn recorder(store: &StateStore) -> (Rc<RefCell<Vec<MenuState>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.subscribe(move |state| sink.borrow_mut().push(state.clone()));
        (seen, sub)
    }

    #[test]
    fn test_equal_path_notifies_once() {
        let store = StateStore::new();
        let (seen, _sub) = recorder(&store);
        assert!(store.set_active_path(&[1, 2]));
        assert!(!store.set_active_path(&vec![1, 2]));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].active_path, vec![1, 2]);
    }

    #[test]
    fn test_setters_skip_no_ops() {
        let store = StateStore::new();
        let (seen, _sub) = recorder(&store);
        assert!(!store.set_status(MenuStatus::Closed));
        assert!(!store.set_selection(None));
        assert!(!store.reset());
        assert!(store.set_status(MenuStatus::Open));
        assert!(store.set_selection(Some(&[0][..])));
        assert!(!store.set_selection(Some(&[0][..])));
        assert!(store.reset());
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(store.state(), MenuState::default());
    }

    #[test]
    fn test_path_is_copied() {
        let store = StateStore::new();
        let mut path = vec![3, 1];
        store.set_active_path(&path);
        path.push(9);
        assert_eq!(store.state().active_path, vec![3, 1]);
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let store = StateStore::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        let _first = store.subscribe(move |_| a.borrow_mut().push("first"));
        let _second = store.subscribe(move |_| b.borrow_mut().push("second"));
        store.set_status(MenuStatus::Open);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_nested_set_is_queued_in_call_order() {
        let store = StateStore::new();
        let nested = store.clone();
        let _reacts = store.subscribe(move |state| {
            if state.status == MenuStatus::Open && state.active_path.is_empty() {
                nested.set_active_path(&[0]);
            }
        });
        let (seen, _sub) = recorder(&store);

        store.set_status(MenuStatus::Open);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].active_path.is_empty());
        assert_eq!(seen[1].active_path, vec![0]);
        assert_eq!(store.state().active_path, vec![0]);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let store = StateStore::new();
        let (seen, sub) = recorder(&store);
        store.set_status(MenuStatus::Open);
        sub.unsubscribe();
        store.set_status(MenuStatus::Gliding);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_subscription_outlives_store() {
        let store = StateStore::new();
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(MenuStatus::AnimatingOut.to_string(), "ANIMATING_OUT");
        assert_eq!(MenuStatus::from_str("gliding").unwrap(), MenuStatus::Gliding);
        let json = serde_json::to_string(&MenuState::default()).unwrap();
        assert!(json.contains("\"CLOSED\""));
    }
}
