//! The pre-compilation validation pass

use std::fmt::{Debug, Display};

/// Pre-compilation validation of font structures.
///
/// Several limits of the file format are awkward to encode in the type
/// system: glyph codes are 15 bits wide, bitmap dimensions fit a byte and
/// all faces of a font share their glyph count. These requirements are
/// enforced via a validation pass before anything is written.
pub trait Validate {
    /// Ensure that this structure is well-formed, reporting any errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        ctx.into_result()
    }

    /// Validate this structure.
    ///
    /// An implementation should look something like:
    ///
    /// ```rust
    /// # use write_ibmf::validate::{Validate, ValidationCtx};
    /// struct MyRecord {
    ///     my_values: Vec<u16>,
    /// }
    ///
    /// impl Validate for MyRecord {
    ///     fn validate_impl(&self, ctx: &mut ValidationCtx) {
    ///         ctx.in_table("MyRecord", |ctx| {
    ///             ctx.in_field("my_values", |ctx| {
    ///                 if self.my_values.len() > (u16::MAX as usize) {
    ///                     ctx.report("array is too long");
    ///                 }
    ///             })
    ///         })
    ///     }
    /// }
    /// ```
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// This is responsible for tracking the position in the tree at which
/// a given error is reported.
///
/// As validation travels down through the object graph, the path is recorded
/// via appropriate calls to methods like [in_table][Self::in_table] and
/// [in_field][Self::in_field].
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
enum LocationElem {
    Table(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    ///
    /// Errors reported in the closure will include the provided identifer
    /// in their path.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Table(name), f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure in the context of the array item at `index`.
    pub fn in_item(&mut self, index: usize, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Index(index), f);
    }

    /// Report a new error, associating it with the current path.
    pub fn report(&mut self, msg: impl Display) {
        self.errors.push(ValidationError {
            location: self.cur_location.clone(),
            error: msg.to_string(),
        });
    }

    /// `Ok` if nothing was reported.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport {
                errors: self.errors,
            })
        }
    }

    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }
}

impl ValidationReport {
    /// The number of errors in the report.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error messages, without their locations.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.errors.iter().map(|e| e.error.as_str())
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return writeln!(f, "Validation error:\n{error}");
        }

        writeln!(f, "{} validation errors:", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "#{}\n{error}", i + 1)?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\"{}\"", self.error)?;
        let mut indent = 0;
        for (i, elem) in self.location.iter().enumerate() {
            match elem {
                LocationElem::Table(name) if i == 0 => write!(f, "in: {name}"),
                LocationElem::Table(name) => {
                    indent += 1;
                    write!(f, "\n{:width$}{name}", "", width = indent * 2)
                }
                LocationElem::Field(name) => write!(f, ".{name}"),
                LocationElem::Index(idx) => write!(f, "[{idx}]"),
            }?;
        }
        writeln!(f)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        for (i, item) in self.iter().enumerate() {
            ctx.in_item(i, |ctx| item.validate_impl(ctx));
        }
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if let Some(t) = self {
            t.validate_impl(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sizes(Vec<u16>);

    impl Validate for Sizes {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_table("Sizes", |ctx| {
                ctx.in_field("values", |ctx| {
                    for (i, value) in self.0.iter().enumerate() {
                        if *value > 255 {
                            ctx.in_item(i, |ctx| ctx.report("value too large"));
                        }
                    }
                })
            })
        }
    }

    #[test]
    fn report_location() {
        assert!(Sizes(vec![1, 2]).validate().is_ok());
        let report = Sizes(vec![1, 300, 400]).validate().unwrap_err();
        assert_eq!(report.len(), 2);
        let text = report.to_string();
        assert!(text.starts_with("2 validation errors:"), "{text}");
        assert!(text.contains("in: Sizes.values[1]"), "{text}");
    }
}
