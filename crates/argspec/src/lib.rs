//! Declarative command specifications, argument parsing and help rendering.
//!
//! Callers describe a flat list of [`Command`]s, each with positional
//! [`Param`]s and aliased [`Flag`]s, then hand a pre-split token sequence to
//! [`parse`]. The first token selects the command; the rest is scanned in one
//! pass against that command. The same model drives [`render_help`].
//!
//! ```
//! use argspec::{Command, Flag, Param, Value, parse};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let commands = vec![
//!     Command::new("brightness", "adjust the brightness of an image")?
//!         .arg(Param::new("image", "the file to open")?)?
//!         .arg(Param::new("level", "")?.parser(|s| Ok(Value::Float(s.parse()?))))?
//!         .arg(Flag::new("output", "the output file path")?.short("-o")?.long("--output")?.valued())?,
//! ];
//!
//! let m = parse(&commands, &["brightness", "cat.png", "0.5", "-o", "out.png"])?;
//! assert_eq!(m.command_name(), "brightness");
//! assert_eq!(m.get("level"), Some(&Value::Float(0.5)));
//! assert_eq!(m.get_str("output"), Some("out.png"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod help;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod spec;
pub mod value;

pub use error::{BoxError, ConvertError, Interrupted, ParseError, SpecError};
pub use help::{help_text, render_help};
pub use parser::{parse, parse_command};
pub use registry::{find_command, validate_commands};
pub use spec::{Arg, Command, Converter, Flag, FlagKind, Param};
pub use value::{Matches, Value};
