//! Model name resolution.

/// Short name aliases for Imagen models.
const ALIASES: &[(&str, &str)] = &[
    ("imagen-3", "imagen-3.0-generate-002"),
    ("imagen-4", "imagen-4.0-generate-001"),
    ("imagen-4-fast", "imagen-4.0-fast-generate-001"),
    ("imagen-4-ultra", "imagen-4.0-ultra-generate-001"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    for &(alias, full) in ALIASES {
        if name == alias {
            return full.to_string();
        }
    }
    name.to_string()
}

/// Check that a resolved model name is served by the Imagen `:predict` endpoint.
///
/// # Errors
///
/// Returns an error if the model name is not an Imagen model.
pub fn validate_model(model: &str) -> Result<(), String> {
    if model.starts_with("imagen-") {
        Ok(())
    } else {
        Err(format!("Unsupported model '{model}'. Expected 'imagen-*' or one of: {}", alias_list()))
    }
}

fn alias_list() -> String {
    ALIASES.iter().map(|(alias, _)| *alias).collect::<Vec<_>>().join(", ")
}
