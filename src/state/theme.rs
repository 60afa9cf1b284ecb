use crate::io::storage::Storage;
use crate::model::theme::Theme;
use crate::state::observe::{Subject, SubscriptionId};

/// The light/dark preference. Changes are written to storage before
/// observers hear about them.
pub struct ThemeState {
    current: Subject<Theme>,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        ThemeState {
            current: Subject::new(theme),
        }
    }

    pub fn load(storage: &Storage) -> Self {
        ThemeState::new(storage.load_theme())
    }

    pub fn current(&self) -> Theme {
        *self.current.get()
    }

    pub fn is_dark(&self) -> bool {
        self.current() == Theme::Dark
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Theme) + 'static) -> SubscriptionId {
        self.current.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.current.unsubscribe(id)
    }

    /// Switch to `theme`. Returns false, without writing, if already set.
    pub fn set(&mut self, theme: Theme, storage: &Storage) -> bool {
        if theme == self.current() {
            return false;
        }
        storage.save_theme(theme);
        self.current.next(theme);
        true
    }

    pub fn toggle(&mut self, storage: &Storage) -> Theme {
        let next = self.current().toggled();
        self.set(next, storage);
        next
    }
}
