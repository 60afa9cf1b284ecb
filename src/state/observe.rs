//! Current-value subjects with synchronous observers.

/// Handle returned by [`Subject::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;

/// Holds a current value and calls every subscriber whenever it changes.
/// New subscribers are called once with the current value.
pub struct Subject<T> {
    value: T,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer<T>)>,
}

impl<T> Subject<T> {
    pub fn new(value: T) -> Self {
        Subject {
            value,
            next_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe(&mut self, mut observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        observer(&self.value);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replace the value and notify
    pub fn next(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Edit the value in place and notify
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.notify();
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.value);
        }
    }
}
