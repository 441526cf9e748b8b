//! Import block resolution.

use crate::config::ImportConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::model::GenerationUnit;
use std::collections::BTreeSet;

/// Maps package qualifiers to import statements through a fixed table
#[derive(Debug, Clone, Copy)]
pub struct ImportResolver<'c> {
    config: &'c ImportConfig,
}

impl<'c> ImportResolver<'c> {
    pub fn new(config: &'c ImportConfig) -> Self {
        Self { config }
    }

    /// Sorted, deduplicated imports needed by the file generated for `unit`
    ///
    /// Covers the qualifiers the pass skeletons always reference plus that of
    /// every field carrying one, flagged or not.
    pub fn resolve(&self, unit: &GenerationUnit) -> CodegenResult<Vec<String>> {
        let field_qualifiers = unit
            .fields
            .iter()
            .filter_map(|field| field.ty.package_qualifier.as_deref());

        let qualifiers: BTreeSet<&str> = self
            .config
            .always
            .iter()
            .map(String::as_str)
            .chain(field_qualifiers)
            .collect();

        let imports = qualifiers
            .into_iter()
            .map(|qualifier| {
                self.config.table.get(qualifier).cloned().ok_or_else(|| {
                    CodegenError::UnresolvableImport {
                        type_name: unit.name.clone(),
                        qualifier: qualifier.to_string(),
                    }
                })
            })
            .collect::<CodegenResult<BTreeSet<String>>>()?;

        Ok(imports.into_iter().collect())
    }
}
