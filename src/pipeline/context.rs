//! Naming context: how a sanitized identity becomes a table name and a checkpoint location.

use crate::Opts;

/// Placeholder substituted with the sanitized identity.
pub const TABLE_PLACEHOLDER: &str = "{table}";

/// Templates for destination table and checkpoint location. Both must contain `{table}`;
/// any other placeholders are resolved before planning (see [`NamingContext::from_opts`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingContext {
    pub table_template: String,
    pub checkpoint_template: String,
}

impl NamingContext {
    pub fn new(table_template: impl Into<String>, checkpoint_template: impl Into<String>) -> Self {
        Self {
            table_template: table_template.into(),
            checkpoint_template: checkpoint_template.into(),
        }
    }

    /// Resolve `{catalog}`, `{schema}` and `{volumes_root}` from `opts`, leaving `{table}` open.
    pub fn from_opts(opts: &Opts) -> Self {
        Self {
            table_template: expand_namespace(&opts.table_template, opts),
            checkpoint_template: expand_namespace(&opts.checkpoint_template, opts),
        }
    }

    pub fn table_for(&self, identity: &str) -> String {
        self.table_template.replace(TABLE_PLACEHOLDER, identity)
    }

    pub fn checkpoint_for(&self, identity: &str) -> String {
        self.checkpoint_template.replace(TABLE_PLACEHOLDER, identity)
    }
}

/// Substitute namespace placeholders in `template`.
pub fn expand_namespace(template: &str, opts: &Opts) -> String {
    template
        .replace("{volumes_root}", opts.volumes_root.trim_end_matches('/'))
        .replace("{catalog}", &opts.catalog)
        .replace("{schema}", &opts.schema)
}
