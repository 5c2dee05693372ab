/// Writer contract shared by every output format
pub mod item;

/// Value masking policies
pub mod masking;

/// Header naming strategies
pub mod naming;

/// Record-level and field-level directives
pub mod record;
