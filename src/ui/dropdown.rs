use std::sync::{Arc, Mutex, PoisonError};

/// The survey date selector as the picker sees it
pub trait SurveyDropdown: Send {
    /// Removes every option
    fn clear(&mut self);

    /// Appends an option
    fn add_option(&mut self, value: &str, label: &str);

    /// Marks the option with this value as selected; `None` selects nothing
    fn set_value(&mut self, value: Option<&str>);
}

/// Shared dropdowns, so the owner can keep reading the one handed to the picker
impl<D: SurveyDropdown> SurveyDropdown for Arc<Mutex<D>> {
    fn clear(&mut self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn add_option(&mut self, value: &str, label: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_option(value, label);
    }

    fn set_value(&mut self, value: Option<&str>) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_value(value);
    }
}

/// One entry of a [`MemoryDropdown`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

/// Dropdown kept in memory, for headless front ends and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDropdown {
    options: Vec<DropdownOption>,
    value: Option<String>,
}

impl MemoryDropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    /// Option values in display order
    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    /// Selected value, if it matches an option
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl SurveyDropdown for MemoryDropdown {
    fn clear(&mut self) {
        self.options.clear();
        self.value = None;
    }

    fn add_option(&mut self, value: &str, label: &str) {
        self.options.push(DropdownOption {
            value: value.to_string(),
            label: label.to_string(),
        });
    }

    fn set_value(&mut self, value: Option<&str>) {
        // Like an HTML select, a value without a matching option selects nothing
        self.value = value
            .filter(|v| self.options.iter().any(|o| o.value == *v))
            .map(str::to_string);
    }
}
