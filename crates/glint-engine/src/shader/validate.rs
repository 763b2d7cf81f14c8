use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::ShaderError;

/// Entry point name of both the fixed vertex stage and user fragment stages.
pub const ENTRY_POINT: &str = "main";

/// Checks user fragment source against what the viewport pipeline provides.
///
/// Runs entirely on the CPU: parse, naga validation, then the pipeline
/// interface (entry point, inputs, outputs, resource bindings).
pub fn validate_fragment(source: &str, label: &str) -> Result<(), ShaderError> {
    let module = wgsl::parse_str(source).map_err(|err| ShaderError::Parse {
        label: label.to_string(),
        diagnostic: err.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|err| ShaderError::Validation {
            label: label.to_string(),
            diagnostic: err.to_string(),
        })?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == ENTRY_POINT && ep.stage == naga::ShaderStage::Fragment)
        .ok_or_else(|| ShaderError::MissingEntryPoint {
            label: label.to_string(),
            entry: ENTRY_POINT,
        })?;

    for arg in &entry.function.arguments {
        for location in locations(&module, arg.ty, arg.binding.as_ref()) {
            if location != 0 {
                return Err(ShaderError::UnsupportedInput {
                    label: label.to_string(),
                    location,
                });
            }
        }
    }

    if let Some(result) = &entry.function.result {
        for location in locations(&module, result.ty, result.binding.as_ref()) {
            if location != 0 {
                return Err(ShaderError::UnsupportedOutput {
                    label: label.to_string(),
                    location,
                });
            }
        }
    }

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let is_uniform_block = rb.group == 0
            && rb.binding == 0
            && matches!(var.space, naga::AddressSpace::Uniform);
        if !is_uniform_block {
            return Err(ShaderError::UnsupportedBinding {
                label: label.to_string(),
                group: rb.group,
                binding: rb.binding,
            });
        }
    }

    Ok(())
}

/// `@location` indices carried by a binding, looking through struct members.
fn locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
) -> Vec<u32> {
    match binding {
        Some(naga::Binding::Location { location, .. }) => vec![*location],
        Some(naga::Binding::BuiltIn(_)) => vec![],
        None => match &module.types[ty].inner {
            naga::TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match &m.binding {
                    Some(naga::Binding::Location { location, .. }) => Some(*location),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        },
    }
}
