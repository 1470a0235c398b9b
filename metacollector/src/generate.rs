//! Deterministic rendering of the validated registry into the generated
//! header and source texts.
//!
//! Emission is a pure function of the registry, the generator name, and the
//! banner timestamp. No I/O happens here; the driver writes the returned
//! strings. Identical inputs produce byte-identical output.

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::model::{ClassRecord, Registry};

/// The reusable wrapper emitted verbatim into the generated header. It
/// stores one value, converts implicitly on read, and routes every
/// assignment through the forwarding function with the owning instance
/// recovered from the stored byte offset.
const PROPERTY_TEMPLATE: &str = r#"template<typename Parent, typename Type, int Offset, void (*Func)(Parent*, Type&, const Type&)>
class metacollector_customproperty
{
public:
	using Self = metacollector_customproperty<Parent, Type, Offset, Func>;

	metacollector_customproperty(){}
	metacollector_customproperty (const Type& a) :
		m_value (a) {}

	Self& operator= (const Type& a)
	{
		(*Func) (reinterpret_cast<Parent*> (this - Offset), m_value, a);
		return *this;
	}

	operator const Type&() const
	{
		return m_value;
	}

	const Type& value() const
	{
		return m_value;
	}

private:
	Type m_value;
};
"#;

/// Both generated translation units, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub header: String,
    pub source: String,
}

/// Name of the forwarding function for one class/property pair. Unique per
/// pair by construction.
pub fn redirector_name(class: &str, property: &str) -> String {
    format!("metacollector_property_{class}_{property}")
}

/// Renders the registry into the header and source units in one pass, in
/// discovery order throughout.
pub fn generate(
    registry: &Registry,
    generator: &str,
    generated_at: DateTime<Local>,
) -> GeneratedOutput {
    let mut header = String::new();
    let mut source = String::new();

    let banner = format!(
        "// Auto-generated by {generator} at {}\n// This file will be overwritten, do not edit by hand.\n\n",
        generated_at.format("%a %b %e %H:%M:%S %Y")
    );
    header.push_str(&banner);
    source.push_str(&banner);

    // The marker macros keep annotated sources compiling standalone:
    // PROPERTY absorbs its arguments, CLASSDATA expands to the per-class
    // generated macro.
    header.push_str("#pragma once\n");
    header.push_str("#include <cstddef>\n");
    header.push_str("#define PROPERTY(...)\n");
    header.push_str("#define CLASSDATA(A) METACOLLECTOR_CLASS_DATA_##A\n");
    header.push('\n');

    for path in &registry.includes {
        let _ = writeln!(source, "#include \"{path}\"");
    }

    for class in &registry.classes {
        let _ = writeln!(header, "class {};", class.name);
    }

    source.push('\n');
    header.push('\n');
    header.push_str(PROPERTY_TEMPLATE);
    header.push('\n');

    // Redirectors: declaration in the header, definition in the source.
    for class in &registry.classes {
        for property in &class.properties {
            let Some(write) = property.write.as_deref() else {
                continue;
            };

            let signature = format!(
                "void {} ({}* parent, {}& value, {} const& newValue)",
                redirector_name(&class.name, &property.name),
                class.name,
                property.type_name,
                property.type_name
            );
            let _ = writeln!(header, "{signature};");
            let _ = writeln!(source, "{signature}");
            source.push_str("{\n");
            let _ = writeln!(source, "\tparent->{write} (value, newValue);");
            source.push_str("}\n\n");
        }
    }

    for class in &registry.classes {
        emit_class_macro(&mut header, class);
    }

    GeneratedOutput { header, source }
}

/// Emits the per-class code-insertion macro: the `Self` alias, the offset
/// reference struct, and every property's storage and accessor
/// declarations, all as one line-continued macro body.
fn emit_class_macro(header: &mut String, class: &ClassRecord) {
    let _ = writeln!(header, "#define METACOLLECTOR_CLASS_DATA_{} \\", class.name);
    let _ = writeln!(header, "using Self = {}; \\", class.name);

    header.push_str("struct OffsetReference \\\n\t{ \\\n");
    for property in &class.properties {
        let _ = writeln!(header, "\t\t{} {}; \\", property.type_name, property.name);
    }
    header.push_str("}; \\\n\\\n");

    for property in &class.properties {
        header.push_str("public:\\\n");

        if property.needs_wrapper() {
            let _ = writeln!(
                header,
                "\tmetacollector_customproperty<{}, {}, offsetof (OffsetReference, {}), {}> {}; \\",
                class.name,
                property.type_name,
                property.name,
                redirector_name(&class.name, &property.name),
                property.name
            );
        } else {
            let _ = writeln!(header, "\t{} {}; \\", property.type_name, property.name);
        }

        if let Some(read) = property.read.as_deref() {
            let _ = writeln!(header, "\tvoid {read} ({} const& value) const; \\", property.type_name);
        }
        if let Some(write) = property.write.as_deref() {
            let _ = writeln!(
                header,
                "\tvoid {write} ({}& value, {} const& newValue); \\",
                property.type_name, property.type_name
            );
        }
    }

    header.push('\n');
}
