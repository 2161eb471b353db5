//! Embedded unit templates.

/// Name of the version unit template.
pub const VERSION_TEMPLATE_NAME: &str = "version";

/// Name of the register unit template.
pub const REGISTER_TEMPLATE_NAME: &str = "register";

/// Source unit of one service version.
pub const VERSION_TEMPLATE: &str = r#"// Code generated by protoc-gen-svc. DO NOT EDIT.
// package: {{ package }}
// service: {{ service }}

pub mod validator {
    //! Registered as `{{ validator }}`.
{% for v in validators %}

    /// Validates `{{ v.message }}`.
    pub fn {{ v.function }}(&self, input: &{{ v.message }}) -> Result<(), Status> {
{% for check in v.checks %}
        {{ check }}
{% endfor %}
        Ok(())
    }
{% endfor %}
}
{% if not is_private %}

pub mod converter {
    //! Registered as `{{ converter }}`.
{% for c in converters %}

    pub {{ c.signature }} {
{% for line in c.body %}
        {{ line }}
{% endfor %}
    }
{% endfor %}
}
{% endif %}

pub mod service {
{% for m in methods %}

{% if m.deprecated %}
    #[deprecated]
{% endif %}
    pub fn {{ m.name }}(&self, ctx: &Context, input: {{ m.input }}, mut mutations: Mutations) -> Result<{{ m.output }}, Status> {
{% for step in m.steps %}
        {{ step }}
{% endfor %}
    }
{% endfor %}
}
{% if mutators %}

pub mod mutators {
{% for mutator in mutators %}
{% for setter in mutator.setters %}

    /// Sets `{{ setter[1] }}` on `{{ mutator.message }}`.
    pub fn {{ setter[0] }}(value: Value) -> Mutation {
        Mutation::new("{{ mutator.message }}", "{{ setter[1] }}", value)
    }
{% endfor %}
{% endfor %}
}
{% endif %}
"#;

/// Root unit wiring the chain together.
pub const REGISTER_TEMPLATE: &str = r#"// Code generated by protoc-gen-svc. DO NOT EDIT.

/// Registers every version of the chain, oldest first. Strategies in
/// `overrides` replace the default validator or converter with the same
/// key.
pub fn register(server: &mut Server, backend: Backend, overrides: Overrides) -> Result<(), Status> {
    let mut registry = Registry::new(backend);
{% for link in links %}
    registry.validator("{{ link.validator }}", overrides.validator("{{ link.validator }}"));
{% if link.converter %}
    registry.converter("{{ link.converter }}", overrides.converter("{{ link.converter }}"));
    registry.link("{{ link.package }}", "{{ link.next }}");
{% endif %}
{% endfor %}
{% for link in links %}
    server.register("{{ link.package }}.{{ link.service }}", registry.service("{{ link.package }}")?);
{% endfor %}
    Ok(())
}
"#;
