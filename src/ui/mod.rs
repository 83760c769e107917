pub mod builder;
pub mod cell;
pub mod dropdown;
pub mod picker;

pub use builder::PickerBuilder;
pub use cell::{SurveyCell, SurveyObserver};
pub use dropdown::{DropdownOption, MemoryDropdown, SurveyDropdown};
pub use picker::{SurveyPicker, SurveyUpdate};
