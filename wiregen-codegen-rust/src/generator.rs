//! The Rust code generator.
//!
//! One schema file becomes one Rust module: messages and enums become
//! serde-derived data types with `Message` descriptor impls, services
//! become a client stub, a handler trait, and a dispatch function over
//! the `wiregen_runtime` traits.

use std::collections::{BTreeSet, HashMap};

use eyre::bail;
use wiregen_codegen::builder::{CodeFragment, Renderable};
use wiregen_codegen::generation::ImportCollector;
use wiregen_codegen::linker::SymbolKind;
use wiregen_codegen::{CodeGenerator, GenerationContext};
use wiregen_core::GENERATED_HEADER;
use wiregen_schema::{
    Cardinality, Decl, EnumDecl, FieldDecl, MessageDecl, SchemaFile, ServiceDecl, TypeRef,
};

use crate::ast::{Arm, Const, Enum, Field, Fn, Impl, Match, Param, Struct, Variant};
use crate::naming;
use crate::rust_file::{RustFile, Use};
use crate::type_mapper::RustTypeMapper;

/// Generates one Rust module per schema file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustGenerator;

impl CodeGenerator for RustGenerator {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn generate(&self, file: &SchemaFile, context: &GenerationContext<'_>) -> eyre::Result<String> {
        UnitBuilder::new(*context).render(file)
    }
}

/// Collects the imports and items of a single generated module.
struct UnitBuilder<'a> {
    context: GenerationContext<'a>,
    mapper: RustTypeMapper,
    imports: ImportCollector,
    /// Bare type names already bound in this module, mapped to the module
    /// they came from. A second type with the same bare name from another
    /// module is referenced by its full path instead of imported.
    bound: HashMap<String, String>,
    runtime: BTreeSet<&'static str>,
    serde: bool,
}

impl<'a> UnitBuilder<'a> {
    fn new(context: GenerationContext<'a>) -> Self {
        Self {
            context,
            mapper: RustTypeMapper,
            imports: ImportCollector::new(),
            bound: HashMap::new(),
            runtime: BTreeSet::new(),
            serde: false,
        }
    }

    fn render(mut self, file: &SchemaFile) -> eyre::Result<String> {
        // Local declarations take the bare name; imports that would
        // collide with them fall back to fully qualified paths.
        for decl in &file.decls {
            self.bound
                .insert(naming::type_name(decl.name()), String::new());
        }

        let mut items: Vec<Vec<CodeFragment>> = Vec::new();
        for decl in &file.decls {
            match decl {
                Decl::Message(message) => {
                    items.push(self.message_struct(message)?.to_fragments());
                    items.push(self.message_impl(file, message)?);
                }
                Decl::Enum(decl) => items.push(self.enum_type(decl).to_fragments()),
                Decl::Service(service) => {
                    items.push(self.client_struct(file, service).to_fragments());
                    items.push(self.client_impl(file, service)?.to_fragments());
                    items.push(self.handler_trait(file, service)?);
                    items.push(self.dispatch_fn(file, service)?.to_fragments());
                }
            }
        }

        let mut rust_file = RustFile::new();
        if self.serde {
            rust_file = rust_file.use_stmt(Use::new("serde").symbols(["Deserialize", "Serialize"]));
        }
        if !self.runtime.is_empty() {
            rust_file =
                rust_file.use_stmt(Use::new("wiregen_runtime").symbols(self.runtime.iter().copied()));
        }
        let mut cross_file: Vec<_> = self.imports.iter().collect();
        cross_file.sort_by_key(|(module, _)| *module);
        for (module, symbols) in cross_file {
            rust_file =
                rust_file.use_stmt(Use::new(module).symbols(symbols.iter().map(String::as_str)));
        }
        for fragments in items {
            rust_file = rust_file.add_fragments(fragments);
        }

        Ok(rust_file.render_with_header(&self.header()))
    }

    fn header(&self) -> String {
        let rel_path = &self.context.table.view(self.context.file).rel_path;
        let source = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}\n// Source: {}", GENERATED_HEADER, source)
    }

    /// Resolve a named type reference to the Rust path it is written as
    /// here, registering a use statement for cross-file references.
    fn named_type(&mut self, name: &str) -> eyre::Result<(String, SymbolKind)> {
        let table = self.context.table;
        let Some(symbol) = table.resolve(name, self.context.file) else {
            bail!("unresolved type '{}'", name);
        };
        let type_name = naming::type_name(&symbol.local_name);
        if symbol.file == self.context.file {
            return Ok((type_name, symbol.kind));
        }
        let view = table.view(symbol.file);
        let module = naming::module_path(self.context.module, &view.rel_path);
        match self.bound.get(&type_name) {
            Some(bound) if *bound != module => {
                Ok((format!("{}::{}", module, type_name), symbol.kind))
            }
            Some(_) => Ok((type_name, symbol.kind)),
            None => {
                self.imports.add(&module, &type_name);
                self.bound.insert(type_name.clone(), module);
                Ok((type_name, symbol.kind))
            }
        }
    }

    fn rpc_type(&mut self, ty: &TypeRef) -> eyre::Result<String> {
        // The parser rejects scalar rpc types; the linker checks the kind.
        let Some(name) = ty.as_named() else {
            bail!("rpc type is not a named message");
        };
        let (type_name, _) = self.named_type(name)?;
        Ok(type_name)
    }

    fn message_struct(&mut self, message: &MessageDecl) -> eyre::Result<Struct> {
        self.serde = true;
        let mut item = Struct::new(naming::type_name(&message.name))
            .derive("Clone")
            .derive("Debug")
            .derive("Default")
            .derive("Deserialize")
            .derive("PartialEq")
            .derive("Serialize")
            .attr("serde(default)");
        for field in &message.fields {
            let ty = self.field_type(field)?;
            item = item.field(Field::new(naming::field_name(&field.name), ty));
        }
        Ok(item)
    }

    fn field_type(&mut self, field: &FieldDecl) -> eyre::Result<String> {
        match &field.ty {
            TypeRef::Scalar(scalar) => {
                let base = self.mapper.scalar(*scalar);
                Ok(match field.cardinality {
                    Cardinality::Repeated => self.mapper.repeated(base),
                    Cardinality::Optional => self.mapper.optional(base),
                    Cardinality::Singular => base.to_string(),
                })
            }
            TypeRef::Named(name) => {
                let (path, kind) = self.named_type(name)?;
                Ok(match (kind, field.cardinality) {
                    (_, Cardinality::Repeated) => self.mapper.repeated(&path),
                    // Message fields are boxed so recursive schemas stay
                    // representable.
                    (SymbolKind::Message, _) => {
                        self.mapper.optional(&format!("Box<{}>", path))
                    }
                    (_, Cardinality::Optional) => self.mapper.optional(&path),
                    (_, Cardinality::Singular) => path,
                })
            }
        }
    }

    fn message_impl(
        &mut self,
        file: &SchemaFile,
        message: &MessageDecl,
    ) -> eyre::Result<Vec<CodeFragment>> {
        self.runtime.insert("FieldDescriptor");
        self.runtime.insert("Message");
        let mut body = vec![
            CodeFragment::Line(format!(
                "const NAME: &'static str = \"{}\";",
                file.qualify(&message.name)
            )),
            CodeFragment::Blank,
        ];
        if message.fields.is_empty() {
            body.push(CodeFragment::Line(
                "const FIELDS: &'static [FieldDescriptor] = &[];".to_string(),
            ));
        } else {
            let mut rows = Vec::new();
            for field in &message.fields {
                rows.push(CodeFragment::Line(self.field_descriptor(field)?));
            }
            body.push(CodeFragment::block(
                "const FIELDS: &'static [FieldDescriptor] = &[",
                rows,
                Some("];".to_string()),
            ));
        }
        Ok(vec![CodeFragment::block(
            format!("impl Message for {} {{", naming::type_name(&message.name)),
            body,
            Some("}".to_string()),
        )])
    }

    fn field_descriptor(&mut self, field: &FieldDecl) -> eyre::Result<String> {
        self.runtime.insert("Cardinality");
        self.runtime.insert("FieldKind");
        let kind = match &field.ty {
            TypeRef::Scalar(scalar) => {
                self.runtime.insert("ScalarKind");
                format!(
                    "FieldKind::Scalar(ScalarKind::{})",
                    self.mapper.scalar_kind(*scalar)
                )
            }
            TypeRef::Named(name) => {
                let (_, kind) = self.named_type(name)?;
                match kind {
                    SymbolKind::Enum => "FieldKind::Enum".to_string(),
                    _ => "FieldKind::Message".to_string(),
                }
            }
        };
        let cardinality = match field.cardinality {
            Cardinality::Singular => "Cardinality::Singular",
            Cardinality::Optional => "Cardinality::Optional",
            Cardinality::Repeated => "Cardinality::Repeated",
        };
        Ok(format!(
            "FieldDescriptor {{ name: \"{}\", tag: {}, kind: {}, cardinality: {} }},",
            field.name, field.tag, kind, cardinality
        ))
    }

    fn enum_type(&mut self, decl: &EnumDecl) -> Enum {
        self.serde = true;
        let mut item = Enum::new(naming::type_name(&decl.name))
            .derive("Clone")
            .derive("Copy")
            .derive("Debug")
            .derive("Default")
            .derive("Deserialize")
            .derive("Eq")
            .derive("PartialEq")
            .derive("Serialize");
        for (i, value) in decl.values.iter().enumerate() {
            let mut variant =
                Variant::new(naming::variant_name(&value.name)).discriminant(value.number);
            // The first value is the zero value and doubles as Default.
            if i == 0 {
                variant = variant.attr("default");
            }
            item = item.variant(variant);
        }
        item
    }

    fn client_struct(&self, file: &SchemaFile, service: &ServiceDecl) -> Struct {
        Struct::new(format!("{}Client<C>", naming::type_name(&service.name)))
            .doc(format!(
                "Client stub for `{}`.",
                file.qualify(&service.name)
            ))
            .derive("Clone")
            .derive("Debug")
            .field(Field::new("channel", "C").private())
    }

    fn client_impl(&mut self, file: &SchemaFile, service: &ServiceDecl) -> eyre::Result<Impl> {
        self.runtime.insert("Channel");
        self.runtime.insert("MethodDescriptor");
        let service_name = naming::type_name(&service.name);
        let qualified = file.qualify(&service.name);
        let mut item = Impl::new(format!("{}Client<C>", service_name)).generics("C: Channel");
        for rpc in &service.rpcs {
            item = item.assoc_const(Const::new(
                naming::const_name(&rpc.name),
                "MethodDescriptor",
                format!(
                    "MethodDescriptor {{ service: \"{}\", method: \"{}\" }}",
                    qualified, rpc.name
                ),
            ));
        }
        item = item.method(
            Fn::new("new")
                .param(Param::new("channel", "C"))
                .returns("Self")
                .body_line("Self { channel }"),
        );
        for rpc in &service.rpcs {
            self.runtime.insert("ServiceError");
            self.runtime.insert("unary");
            let request = self.rpc_type(&rpc.request)?;
            let response = self.rpc_type(&rpc.response)?;
            item = item.method(
                Fn::new(naming::method_name(&rpc.name))
                    .doc(format!("Calls `{}/{}`.", qualified, rpc.name))
                    .param(Param::new("&mut self", ""))
                    .param(Param::new("request", format!("&{}", request)))
                    .returns(format!("Result<{}, ServiceError>", response))
                    .body_line(format!(
                        "unary(&mut self.channel, &Self::{}, request)",
                        naming::const_name(&rpc.name)
                    )),
            );
        }
        Ok(item)
    }

    fn handler_trait(
        &mut self,
        file: &SchemaFile,
        service: &ServiceDecl,
    ) -> eyre::Result<Vec<CodeFragment>> {
        let service_name = naming::type_name(&service.name);
        let mut methods = Vec::new();
        for rpc in &service.rpcs {
            self.runtime.insert("ServiceError");
            let request = self.rpc_type(&rpc.request)?;
            let response = self.rpc_type(&rpc.response)?;
            methods.push(CodeFragment::Line(
                Fn::new(naming::method_name(&rpc.name))
                    .private()
                    .param(Param::new("&mut self", ""))
                    .param(Param::new("request", request))
                    .returns(format!("Result<{}, ServiceError>", response))
                    .declaration(),
            ));
        }
        let mut fragments = vec![CodeFragment::RustDoc(format!(
            "Server-side handler for `{}`.",
            file.qualify(&service.name)
        ))];
        if methods.is_empty() {
            fragments.push(CodeFragment::Line(format!(
                "pub trait {}Handler {{}}",
                service_name
            )));
        } else {
            fragments.push(CodeFragment::block(
                format!("pub trait {}Handler {{", service_name),
                methods,
                Some("}".to_string()),
            ));
        }
        Ok(fragments)
    }

    fn dispatch_fn(&mut self, file: &SchemaFile, service: &ServiceDecl) -> eyre::Result<Fn> {
        self.runtime.insert("ServiceError");
        let service_name = naming::type_name(&service.name);
        let qualified = file.qualify(&service.name);
        let mut dispatch = Match::new("method");
        for rpc in &service.rpcs {
            self.runtime.insert("decode");
            self.runtime.insert("encode");
            let request = self.rpc_type(&rpc.request)?;
            dispatch = dispatch.arm(
                Arm::new(format!("\"{}\"", rpc.name))
                    .line(format!("let request: {} = decode(request)?;", request))
                    .line(format!(
                        "encode(&handler.{}(request)?)",
                        naming::method_name(&rpc.name)
                    )),
            );
        }
        dispatch = dispatch.arm(Arm::new("other").fragment(CodeFragment::block(
            "Err(ServiceError::UnknownMethod {",
            vec![
                CodeFragment::Line(format!("service: \"{}\".to_string(),", qualified)),
                CodeFragment::Line("method: other.to_string(),".to_string()),
            ],
            Some("})".to_string()),
        )));
        // A service without rpcs still gets a dispatcher, but its inputs
        // go unused there.
        let (handler, request) = if service.rpcs.is_empty() {
            ("_handler", "_request")
        } else {
            ("handler", "request")
        };
        Ok(Fn::new(format!(
            "dispatch_{}",
            naming::method_name(&service.name)
        ))
        .doc(format!(
            "Routes `{}` requests to a handler by method name.",
            qualified
        ))
        .generics(format!("H: {}Handler", service_name))
        .param(Param::new(handler, "&mut H"))
        .param(Param::new("method", "&str"))
        .param(Param::new(request, "&[u8]"))
        .returns("Result<Vec<u8>, ServiceError>")
        .body_node(dispatch))
    }
}
