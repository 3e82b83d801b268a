pub mod colors;
pub mod formatting;
pub mod ids;
pub mod path;
pub mod table;
pub mod time;
