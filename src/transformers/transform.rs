//! Transform trait.

use crate::batch::Column;
use crate::error::Error;

/// Column-to-column transformation.
///
/// Implementations must return as many values as they receive, in the same order.
pub trait ColumnTransform: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, column: Column) -> Result<Column, Error>;
}

/// Named closure implementing [ColumnTransform].
pub struct FnTransform<F> {
    name: String,
    f: F,
}

impl<F> FnTransform<F>
where
    F: Fn(Column) -> Result<Column, Error> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> ColumnTransform for FnTransform<F>
where
    F: Fn(Column) -> Result<Column, Error> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, column: Column) -> Result<Column, Error> {
        (self.f)(column)
    }
}

#[cfg(test)]
mod tests {
    use crate::batch::Value;

    use super::{ColumnTransform, FnTransform};

    #[test]
    fn test_fn_transform() {
        let t = FnTransform::new("double", |c: Vec<Value>| {
            Ok(c.into_iter()
                .map(|v| Value::Int(v.as_int().unwrap_or_default() * 2))
                .collect())
        });
        assert_eq!(t.name(), "double");
        assert_eq!(
            t.apply(vec![Value::Int(1), Value::Int(3)]).unwrap(),
            vec![Value::Int(2), Value::Int(6)]
        );
    }
}
