pub mod console;
pub mod external;
pub mod menu;

pub use console::{Console, StdConsole};
pub use menu::{MenuError, MenuSession};
