//! Writing `Node` trees as YAML text.

use confmelt_config::{Node, Scalar};
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

use crate::{Error, Result};

/// Convert a `Node` into a `yaml_rust2::Yaml` value, keeping map order.
pub fn to_yaml(node: &Node) -> Yaml {
    match node {
        Node::Map(entries) => {
            let mut hash = Hash::new();
            for (key, value) in entries {
                hash.insert(Yaml::String(key.clone()), to_yaml(value));
            }
            Yaml::Hash(hash)
        }
        Node::Sequence(items) => Yaml::Array(items.iter().map(to_yaml).collect()),
        Node::Scalar(scalar) => scalar_to_yaml(scalar),
    }
}

fn scalar_to_yaml(scalar: &Scalar) -> Yaml {
    match scalar {
        // The emitter quotes strings that would read back as another type.
        Scalar::String(s) => Yaml::String(s.clone()),
        Scalar::Integer(i) => Yaml::Integer(*i),
        Scalar::Float(f) => Yaml::Real(float_text(*f)),
        Scalar::Boolean(b) => Yaml::Boolean(*b),
        Scalar::Null => Yaml::Null,
    }
}

/// Float text that always reads back as the same float.
fn float_text(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f == f64::INFINITY {
        ".inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-.inf".to_string()
    } else {
        // Debug keeps the fractional part, so 1.0 is not read back as 1.
        format!("{f:?}")
    }
}

/// Serialize a `Node` as a YAML document.
///
/// The output has no leading `---` marker and ends with a newline.
pub fn emit(node: &Node) -> Result<String> {
    let yaml = to_yaml(node);
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&yaml)
        .map_err(|err| Error::EmitError(format!("{err:?}")))?;

    let body = out.strip_prefix("---").map_or(out.as_str(), str::trim_start);
    let mut text = body.to_string();
    text.push('\n');
    Ok(text)
}
