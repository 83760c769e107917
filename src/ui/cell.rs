use std::fmt;
use std::sync::{Arc, RwLock};

/// Callback invoked with the new value after every write
pub type SurveyObserver = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Observable holder for a survey date.
///
/// The picker keeps two of these: the date the user picked and the date that
/// is actually on screen. Presentation code subscribes instead of the cell
/// writing to any particular surface. Clones share the same value.
#[derive(Clone, Default)]
pub struct SurveyCell {
    inner: Arc<CellInner>,
}

#[derive(Default)]
struct CellInner {
    value: RwLock<Option<String>>,
    observers: RwLock<Vec<SurveyObserver>>,
}

impl SurveyCell {
    /// Creates an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cell with an observer already attached
    pub fn with_observer<F>(observer: F) -> Self
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        let cell = Self::new();
        cell.subscribe(observer);
        cell
    }

    /// Current value
    pub fn get(&self) -> Option<String> {
        self.inner.value.read().ok().and_then(|v| v.clone())
    }

    /// Stores `value` and notifies observers
    pub fn set(&self, value: Option<String>) {
        if let Ok(mut slot) = self.inner.value.write() {
            *slot = value.clone();
        }
        if let Ok(observers) = self.inner.observers.read() {
            for observer in observers.iter() {
                observer(value.as_deref());
            }
        }
    }

    /// Adds an observer; it is not called for the current value
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        if let Ok(mut observers) = self.inner.observers.write() {
            observers.push(Box::new(observer));
        }
    }
}

impl fmt::Debug for SurveyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveyCell")
            .field("value", &self.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_set_notifies_observers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cell = SurveyCell::with_observer(move |value| {
            sink.lock().unwrap().push(value.map(str::to_string));
        });

        assert_eq!(cell.get(), None);
        cell.set(Some("2020-01-01".into()));
        cell.set(None);

        assert_eq!(cell.get(), None);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("2020-01-01".to_string()), None]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let cell = SurveyCell::new();
        let other = cell.clone();
        other.set(Some("2021-06-30".into()));
        assert_eq!(cell.get().as_deref(), Some("2021-06-30"));
    }
}
