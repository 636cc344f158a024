mod cr;

pub use cr::{CrCommands, ProposeArgs};
