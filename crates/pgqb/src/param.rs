//! Parameter values carried alongside built SQL.
//!
//! pgqb renders placeholders (`?` or `:name`) but never numbers them, so
//! there is no positional bookkeeping here. [`Param`] is the type-erased
//! value carrier used wherever the crate hands values back to the caller:
//! filter argument lists, bulk-row named arguments, audit field maps.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly SQL value wrapper using Arc.
///
/// Filters and bulk builders collect values of mixed types; `Param` erases
/// the type behind the driver's `ToSql` so one `Vec<Param>` can carry all
/// of them, and cloning a filter or a row never copies the values.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// Build a `Vec<Param>` from a list of mixed-type values.
///
/// # Example
///
/// ```ignore
/// let args = params![42i64, "active", Utc::now()];
/// ```
#[macro_export]
macro_rules! params {
    () => { Vec::<$crate::Param>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Param::new($value)),+]
    };
}
