//! Code emitter
//!
//! Renders a [`DispatchTable`] as one function in an inherent impl of the
//! configured enclosing type:
//!
//! ```text
//! pub fn get_service_instance(
//!     type_id: TypeId,
//!     context: &mut ServiceCtx,
//!     parameter: Option<Box<dyn Any>>,
//! ) -> Option<Box<dyn IpcService>>
//! ```
//!
//! Rules become `TypeId` equality guards in table order. Inside a guard the
//! payload branch (when present) comes before the context-only branch, and a
//! guard without a context-only branch ends in `return None` so the first
//! matching guard always decides. All std paths are fully qualified so the
//! artifact does not depend on the includer's imports.

use crate::buffer::CodeBuffer;
use crate::config::GeneratorConfig;
use crate::model::{DispatchRule, DispatchTable, Passing};

pub const HEADER: &str = "// This file is auto-generated by ipcgen. Do not edit manually.";

const SOME: &str = "::std::option::Option::Some";
const NONE: &str = "::std::option::Option::None";

pub fn emit(table: &DispatchTable, config: &GeneratorConfig) -> String {
    let service_box = format!("::std::boxed::Box<dyn {}>", config.service_trait);
    let mut buffer = CodeBuffer::new();

    buffer
        .append_line(HEADER)
        .append_line("// Rebuild or run `ipcgen generate` to regenerate.")
        .append_line("")
        .enter_scope(&format!("impl {}", config.enclosing_type))
        .append_line("#[allow(unused_variables, clippy::needless_return)]")
        .enter_scope(&format!(
            "pub fn {}(type_id: ::std::any::TypeId, context: &mut {}, parameter: ::std::option::Option<::std::boxed::Box<dyn ::std::any::Any>>) -> ::std::option::Option<{}>",
            config.function_name, config.context_type, service_box
        ));

    for rule in table.rules() {
        emit_rule(&mut buffer, rule, &service_box);
    }

    buffer.append_line(NONE).leave_scope().leave_scope();
    buffer.finish()
}

fn emit_rule(buffer: &mut CodeBuffer, rule: &DispatchRule, service_box: &str) {
    let target = &rule.target;
    buffer.enter_scope(&format!(
        "if type_id == ::std::any::TypeId::of::<{}>()",
        target
    ));

    if let Some(payload) = &rule.parameterized {
        let binding = if payload.payload == Passing::Mutable {
            "let mut parameter"
        } else {
            "let parameter"
        };
        buffer
            .enter_scope(&format!("if let {}(parameter) = parameter", SOME))
            .append_line(&format!(
                "{} = parameter.downcast::<{}>().ok()?;",
                binding, payload.payload_type
            ));
        let argument = match payload.payload {
            Passing::Value => "*parameter",
            Passing::Shared => "&*parameter",
            Passing::Mutable => "&mut *parameter",
        };
        construct(
            buffer,
            service_box,
            &format!(
                "{}::{}({}, {})",
                target,
                payload.constructor,
                context_argument(payload.context),
                argument
            ),
        );
        buffer.leave_scope();
    }

    match &rule.context_only {
        Some(plain) => construct(
            buffer,
            service_box,
            &format!(
                "{}::{}({})",
                target,
                plain.constructor,
                context_argument(plain.context)
            ),
        ),
        None => {
            buffer.append_line(&format!("return {};", NONE));
        }
    }

    buffer.leave_scope();
}

fn construct(buffer: &mut CodeBuffer, service_box: &str, call: &str) {
    buffer
        .append_line(&format!(
            "let service: {} = ::std::boxed::Box::new({});",
            service_box, call
        ))
        .append_line(&format!("return {}(service);", SOME));
}

fn context_argument(passing: Passing) -> &'static str {
    match passing {
        Passing::Value => "::std::clone::Clone::clone(&*context)",
        Passing::Shared => "&*context",
        Passing::Mutable => "&mut *context",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextConstruction, PayloadConstruction, TypePath};
    use pretty_assertions::assert_eq;

    const SIGNATURE: &str = "    pub fn get_service_instance(type_id: ::std::any::TypeId, context: &mut crate::hos::ServiceCtx, parameter: ::std::option::Option<::std::boxed::Box<dyn ::std::any::Any>>) -> ::std::option::Option<::std::boxed::Box<dyn crate::hos::IpcService>> {\n";

    fn expected(body: &str) -> String {
        format!(
            "{}\n// Rebuild or run `ipcgen generate` to regenerate.\n\nimpl crate::hos::services::sm::UserInterface {{\n    #[allow(unused_variables, clippy::needless_return)]\n{}{}        ::std::option::Option::None\n    }}\n}}\n",
            HEADER, SIGNATURE, body
        )
    }

    #[test]
    fn test_empty_table_falls_back_to_none() {
        let source = emit(&DispatchTable::default(), &GeneratorConfig::default());
        assert_eq!(source, expected(""));
    }

    #[test]
    fn test_payload_branch_precedes_context_only() {
        let table = DispatchTable::new(vec![DispatchRule {
            target: TypePath::new("crate::hos::services::acc::AccountService"),
            context_only: Some(ContextConstruction {
                constructor: "new".to_string(),
                context: Passing::Mutable,
            }),
            parameterized: Some(PayloadConstruction {
                constructor: "with_user".to_string(),
                context: Passing::Shared,
                payload: Passing::Value,
                payload_type: "crate::hos::services::acc::UserId".to_string(),
            }),
        }]);

        let body = "        if type_id == ::std::any::TypeId::of::<crate::hos::services::acc::AccountService>() {
            if let ::std::option::Option::Some(parameter) = parameter {
                let parameter = parameter.downcast::<crate::hos::services::acc::UserId>().ok()?;
                let service: ::std::boxed::Box<dyn crate::hos::IpcService> = ::std::boxed::Box::new(crate::hos::services::acc::AccountService::with_user(&*context, *parameter));
                return ::std::option::Option::Some(service);
            }
            let service: ::std::boxed::Box<dyn crate::hos::IpcService> = ::std::boxed::Box::new(crate::hos::services::acc::AccountService::new(&mut *context));
            return ::std::option::Option::Some(service);
        }
";
        assert_eq!(emit(&table, &GeneratorConfig::default()), expected(body));
    }

    #[test]
    fn test_payload_only_rule_terminates_search() {
        let table = DispatchTable::new(vec![DispatchRule {
            target: TypePath::new("crate::hos::services::fs::Proxy"),
            context_only: None,
            parameterized: Some(PayloadConstruction {
                constructor: "open".to_string(),
                context: Passing::Value,
                payload: Passing::Mutable,
                payload_type: "::std::vec::Vec<u8>".to_string(),
            }),
        }]);

        let body = "        if type_id == ::std::any::TypeId::of::<crate::hos::services::fs::Proxy>() {
            if let ::std::option::Option::Some(parameter) = parameter {
                let mut parameter = parameter.downcast::<::std::vec::Vec<u8>>().ok()?;
                let service: ::std::boxed::Box<dyn crate::hos::IpcService> = ::std::boxed::Box::new(crate::hos::services::fs::Proxy::open(::std::clone::Clone::clone(&*context), &mut *parameter));
                return ::std::option::Option::Some(service);
            }
            return ::std::option::Option::None;
        }
";
        assert_eq!(emit(&table, &GeneratorConfig::default()), expected(body));
    }

    #[test]
    fn test_duplicate_targets_keep_table_order() {
        let rule = |constructor: &str| DispatchRule {
            target: TypePath::new("crate::hos::services::time::StaticService"),
            context_only: Some(ContextConstruction {
                constructor: constructor.to_string(),
                context: Passing::Shared,
            }),
            parameterized: None,
        };
        let table = DispatchTable::new(vec![rule("new"), rule("fallback")]);

        // the second guard is unreachable but still emitted
        let body = "        if type_id == ::std::any::TypeId::of::<crate::hos::services::time::StaticService>() {
            let service: ::std::boxed::Box<dyn crate::hos::IpcService> = ::std::boxed::Box::new(crate::hos::services::time::StaticService::new(&*context));
            return ::std::option::Option::Some(service);
        }
        if type_id == ::std::any::TypeId::of::<crate::hos::services::time::StaticService>() {
            let service: ::std::boxed::Box<dyn crate::hos::IpcService> = ::std::boxed::Box::new(crate::hos::services::time::StaticService::fallback(&*context));
            return ::std::option::Option::Some(service);
        }
";
        assert_eq!(emit(&table, &GeneratorConfig::default()), expected(body));
    }

    #[test]
    fn test_uses_configured_names() {
        let config = GeneratorConfig::builder()
            .enclosing_type("crate::registry::Registry")
            .function_name("create")
            .context_type("crate::Ctx")
            .service_trait("crate::Service")
            .build();
        let source = emit(&DispatchTable::default(), &config);

        assert!(source.contains("impl crate::registry::Registry {"));
        assert!(source.contains(
            "pub fn create(type_id: ::std::any::TypeId, context: &mut crate::Ctx,"
        ));
        assert!(source.contains("::std::option::Option<::std::boxed::Box<dyn crate::Service>> {"));
    }
}
