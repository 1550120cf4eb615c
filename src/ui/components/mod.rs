mod command_input;
mod input;
mod key_result;
mod option_picker;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use option_picker::{OptionPicker, PickerEvent, PickerOption};
pub use search_input::{SearchEvent, SearchInput};
