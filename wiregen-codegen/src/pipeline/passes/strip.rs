//! Self-qualifier stripping.
//!
//! `package a.b;` files may reference their own types as `a.b.Foo`.
//! Downstream stages want one spelling per local type, so references whose
//! qualifier is exactly the declaring file's package are rewritten to the
//! bare local name. The qualifier match is literal; references into other
//! packages (including sub-packages like `a.b.c.Foo`) are left alone.

use wiregen_schema::{Decl, MessageDecl, SchemaFile, TypeRef, split_qualified};

pub(crate) fn run(file: &SchemaFile) -> Vec<SchemaFile> {
    let Some(package) = file.package.clone() else {
        return vec![file.clone()];
    };

    let mut out = file.clone();
    for decl in &mut out.decls {
        match decl {
            Decl::Message(message) => strip_message(message, &package),
            Decl::Service(service) => {
                for rpc in &mut service.rpcs {
                    strip_type(&mut rpc.request, &package);
                    strip_type(&mut rpc.response, &package);
                }
            }
            Decl::Enum(_) => {}
        }
    }
    vec![out]
}

fn strip_message(message: &mut MessageDecl, package: &str) {
    for field in &mut message.fields {
        strip_type(&mut field.ty, package);
    }
    for nested in &mut message.messages {
        strip_message(nested, package);
    }
}

fn strip_type(ty: &mut TypeRef, package: &str) {
    let TypeRef::Named(name) = ty else { return };
    let stripped = match split_qualified(name) {
        (Some(qualifier), symbol) if qualifier == package => Some(symbol.to_string()),
        _ => None,
    };
    if let Some(symbol) = stripped {
        *ty = TypeRef::Named(symbol);
    }
}
