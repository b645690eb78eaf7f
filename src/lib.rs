//! dumpcheck: verify generated IR dumps against ordered check directives.
//!
//! ```no_run
//! use std::path::Path;
//! use dumpcheck::{ArtifactLocator, ArtifactQuery, MethodSignature};
//!
//! let sig = MethodSignature::from_type_names::<&str>(&[], "void")?;
//! let query = ArtifactQuery::new("TestVolatile", "test", &sig);
//! let mut matcher = ArtifactLocator::default().locate(Path::new("."), &query)?;
//! matcher.check("define hotspotcc void @\"TestVolatile_test")?;
//! matcher.check_pattern(r"load atomic i8, ptr addrspace\(1\) %[0-9]+ seq_cst, align 1")?;
//! matcher.check_not("landingpad")?;
//! # Ok::<(), dumpcheck::DumpcheckError>(())
//! ```

pub use crate::buffer::LineBuffer;
pub use crate::directive::{Directive, DirectiveKind};
pub use crate::errors::{
    CheckError, ConfigError, DumpcheckError, LocateError, ScriptError, SignatureError,
};
pub use crate::locate::{Artifact, ArtifactLocator, ArtifactQuery, LocatorConfig, Variant};
pub use crate::matcher::DirectiveMatcher;
pub use crate::signature::{MethodSignature, TypeDescriptor};

pub mod buffer;
pub mod cli;
pub mod directive;
pub mod discovery;
pub mod errors;
pub mod locate;
pub mod matcher;
pub mod normalize;
pub mod pattern;
pub mod script;
pub mod signature;
pub mod telemetry;
