//! Recursive-descent parser for the schema grammar.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::ast::{
    Cardinality, Decl, EnumDecl, EnumValue, FieldDecl, MessageDecl, RpcDecl, ScalarType,
    SchemaFile, ServiceDecl, TypeRef,
};
use crate::error::{Error, Result, SchemaSource};
use crate::lexer::{Token, tokenize};

/// Highest field tag allowed by the wire format.
const MAX_TAG: u32 = 536_870_911;
/// Tag range reserved by the wire format.
const RESERVED_TAGS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Parse schema source text into a [`SchemaFile`].
pub fn parse(src: &str, path: &Path) -> Result<SchemaFile> {
    let source = SchemaSource::new(src, path.display().to_string());
    let tokens = tokenize(src, &source)?;
    let parser = Parser {
        source: &source,
        tokens: &tokens,
        index: 0,
    };
    parser.schema_file(path)
}

/// Read and parse a schema file from disk.
pub fn parse_file(path: &Path) -> Result<SchemaFile> {
    let src = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
    parse(&src, path)
}

struct Parser<'a> {
    source: &'a SchemaSource,
    tokens: &'a [Token],
    index: usize,
}

impl Parser<'_> {
    fn current(&self) -> &Token {
        // tokenize always appends an end-of-input marker
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> &Token {
        let index = self.index.min(self.tokens.len() - 1);
        if !self.tokens[index].is_eof() {
            self.index += 1;
        }
        &self.tokens[index]
    }

    fn at(&self, text: &str) -> bool {
        self.current().text == text
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.at(text) && !text.is_empty() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<()> {
        if self.eat(text) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{text}'")))
        }
    }

    fn unexpected(&self, expected: &str) -> Box<Error> {
        let token = self.current();
        let found = if token.is_eof() {
            "end of file".to_string()
        } else {
            format!("'{}'", token.text)
        };
        self.source.syntax_error(
            format!("expected {expected}, found {found}"),
            Some(token.span()),
        )
    }

    fn expect_ident(&mut self) -> Result<Token> {
        let token = self.current().clone();
        if is_identifier(&token.text) {
            self.bump();
            Ok(token)
        } else {
            Err(self.unexpected("an identifier"))
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        let token = self.current().clone();
        if token.text.starts_with('"') {
            self.bump();
            Ok(unquote(&token.text))
        } else {
            Err(self.unexpected("a string literal"))
        }
    }

    /// A possibly dot-qualified name. A leading dot (fully qualified
    /// reference) is accepted and normalized away.
    fn dotted_name(&mut self) -> Result<String> {
        self.eat(".");
        let mut name = self.expect_ident()?.text;
        while self.eat(".") {
            name.push('.');
            name.push_str(&self.expect_ident()?.text);
        }
        Ok(name)
    }

    fn type_ref(&mut self) -> Result<TypeRef> {
        let token = self.current().clone();
        if token.text == "map" {
            return Err(self.source.unsupported("map field", Some(token.span())));
        }
        let name = self.dotted_name()?;
        match ScalarType::parse(&name) {
            Some(scalar) => Ok(TypeRef::Scalar(scalar)),
            None => Ok(TypeRef::Named(name)),
        }
    }

    fn schema_file(mut self, path: &Path) -> Result<SchemaFile> {
        let mut file = SchemaFile {
            src_path: path.to_path_buf(),
            package: None,
            imports: Vec::new(),
            public_imports: Vec::new(),
            decls: Vec::new(),
        };
        let mut first = true;
        loop {
            let token = self.current().clone();
            if token.is_eof() {
                break;
            }
            match token.text.as_str() {
                ";" => {
                    self.bump();
                    continue;
                }
                "syntax" => {
                    if !first {
                        return Err(self.source.syntax_error(
                            "'syntax' must be the first statement",
                            Some(token.span()),
                        ));
                    }
                    self.syntax_statement()?;
                }
                "package" => {
                    self.bump();
                    if file.package.is_some() {
                        return Err(self
                            .source
                            .syntax_error("duplicate package declaration", Some(token.span())));
                    }
                    file.package = Some(self.dotted_name()?);
                    self.expect(";")?;
                }
                "import" => {
                    self.bump();
                    let public = self.eat("public");
                    let import = self.expect_string()?;
                    self.expect(";")?;
                    if public {
                        file.public_imports.push(import);
                    } else {
                        file.imports.push(import);
                    }
                }
                "option" => {
                    self.bump();
                    self.skip_statement()?;
                }
                "message" => {
                    self.bump();
                    file.decls.push(Decl::Message(self.message()?));
                }
                "enum" => {
                    self.bump();
                    file.decls.push(Decl::Enum(self.enum_decl()?));
                }
                "service" => {
                    self.bump();
                    file.decls.push(Decl::Service(self.service()?));
                }
                "extend" | "group" => {
                    return Err(self.source.unsupported(
                        format!("'{}' declaration", token.text),
                        Some(token.span()),
                    ));
                }
                _ => return Err(self.unexpected("a declaration")),
            }
            first = false;
        }
        Ok(file)
    }

    fn syntax_statement(&mut self) -> Result<()> {
        self.bump();
        self.expect("=")?;
        let token = self.current().clone();
        let value = self.expect_string()?;
        if value != "proto3" {
            return Err(self
                .source
                .unsupported(format!("syntax \"{value}\""), Some(token.span())));
        }
        self.expect(";")?;
        Ok(())
    }

    fn message(&mut self) -> Result<MessageDecl> {
        let name = self.expect_ident()?.text;
        self.expect("{")?;
        let mut message = MessageDecl {
            name,
            fields: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
        };
        let mut seen_tags: HashMap<u32, String> = HashMap::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        loop {
            let token = self.current().clone();
            if self.eat("}") {
                break;
            }
            match token.text.as_str() {
                "" => return Err(self.unexpected("'}'")),
                ";" => {
                    self.bump();
                }
                "message" => {
                    self.bump();
                    message.messages.push(self.message()?);
                }
                "enum" => {
                    self.bump();
                    message.enums.push(self.enum_decl()?);
                }
                "option" | "reserved" => {
                    self.bump();
                    self.skip_statement()?;
                }
                "oneof" | "extensions" | "extend" | "group" => {
                    return Err(self.source.unsupported(
                        format!("'{}' declaration", token.text),
                        Some(token.span()),
                    ));
                }
                _ => {
                    let field = self.field()?;
                    if let Some(previous) = seen_tags.insert(field.tag, field.name.clone()) {
                        return Err(self.source.semantic_error(
                            format!("field tag {} is already used by '{previous}'", field.tag),
                            Some(token.span()),
                        ));
                    }
                    if !seen_names.insert(field.name.clone()) {
                        return Err(self.source.semantic_error(
                            format!("duplicate field name '{}'", field.name),
                            Some(token.span()),
                        ));
                    }
                    message.fields.push(field);
                }
            }
        }
        Ok(message)
    }

    fn field(&mut self) -> Result<FieldDecl> {
        let cardinality = if self.eat("optional") {
            Cardinality::Optional
        } else if self.eat("repeated") {
            Cardinality::Repeated
        } else if self.at("required") {
            let token = self.current().clone();
            return Err(self
                .source
                .unsupported("'required' label", Some(token.span())));
        } else {
            Cardinality::Singular
        };
        let ty = self.type_ref()?;
        let name = self.expect_ident()?.text;
        self.expect("=")?;
        let tag = self.field_tag()?;
        if self.eat("[") {
            self.skip_brackets()?;
        }
        self.expect(";")?;
        Ok(FieldDecl {
            name,
            ty,
            tag,
            cardinality,
        })
    }

    fn field_tag(&mut self) -> Result<u32> {
        let token = self.current().clone();
        if !token
            .text
            .starts_with(|c: char| c.is_ascii_digit() || c == '-')
        {
            return Err(self.unexpected("a field tag"));
        }
        self.bump();
        let Ok(tag) = token.text.parse::<u32>() else {
            return Err(self.source.invalid_tag(
                &token.text,
                "not a positive integer",
                Some(token.span()),
            ));
        };
        if tag == 0 || tag > MAX_TAG {
            return Err(self.source.invalid_tag(
                &token.text,
                "outside the range 1..=536870911",
                Some(token.span()),
            ));
        }
        if RESERVED_TAGS.contains(&tag) {
            return Err(self.source.invalid_tag(
                &token.text,
                "inside the reserved range 19000..=19999",
                Some(token.span()),
            ));
        }
        Ok(tag)
    }

    fn enum_decl(&mut self) -> Result<EnumDecl> {
        let name = self.expect_ident()?.text;
        self.expect("{")?;
        let mut decl = EnumDecl {
            name,
            values: Vec::new(),
        };
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            let token = self.current().clone();
            if self.eat("}") {
                if decl.values.is_empty() {
                    return Err(self.source.semantic_error(
                        format!("enum '{}' has no values", decl.name),
                        Some(token.span()),
                    ));
                }
                break;
            }
            match token.text.as_str() {
                "" => return Err(self.unexpected("'}'")),
                ";" => {
                    self.bump();
                }
                "option" | "reserved" => {
                    self.bump();
                    self.skip_statement()?;
                }
                _ => {
                    let value_name = self.expect_ident()?.text;
                    self.expect("=")?;
                    let number_token = self.current().clone();
                    let Ok(number) = number_token.text.parse::<i32>() else {
                        return Err(self.unexpected("an integer"));
                    };
                    self.bump();
                    if decl.values.is_empty() && number != 0 {
                        return Err(self.source.semantic_error(
                            "the first enum value must be zero",
                            Some(number_token.span()),
                        ));
                    }
                    if self.eat("[") {
                        self.skip_brackets()?;
                    }
                    self.expect(";")?;
                    if !seen.insert(value_name.clone()) {
                        return Err(self.source.semantic_error(
                            format!("duplicate enum value '{value_name}'"),
                            Some(token.span()),
                        ));
                    }
                    decl.values.push(EnumValue {
                        name: value_name,
                        number,
                    });
                }
            }
        }
        Ok(decl)
    }

    fn service(&mut self) -> Result<ServiceDecl> {
        let name = self.expect_ident()?.text;
        self.expect("{")?;
        let mut service = ServiceDecl {
            name,
            rpcs: Vec::new(),
        };
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            let token = self.current().clone();
            if self.eat("}") {
                break;
            }
            match token.text.as_str() {
                "" => return Err(self.unexpected("'}'")),
                ";" => {
                    self.bump();
                }
                "option" => {
                    self.bump();
                    self.skip_statement()?;
                }
                "rpc" => {
                    self.bump();
                    let rpc = self.rpc()?;
                    if !seen.insert(rpc.name.clone()) {
                        return Err(self.source.semantic_error(
                            format!("duplicate rpc '{}'", rpc.name),
                            Some(token.span()),
                        ));
                    }
                    service.rpcs.push(rpc);
                }
                _ => return Err(self.unexpected("'rpc'")),
            }
        }
        Ok(service)
    }

    fn rpc(&mut self) -> Result<RpcDecl> {
        let name = self.expect_ident()?.text;
        self.expect("(")?;
        let request = self.rpc_type()?;
        self.expect(")")?;
        self.expect("returns")?;
        self.expect("(")?;
        let response = self.rpc_type()?;
        self.expect(")")?;
        if self.eat("{") {
            self.skip_block()?;
        } else {
            self.expect(";")?;
        }
        Ok(RpcDecl {
            name,
            request,
            response,
        })
    }

    fn rpc_type(&mut self) -> Result<TypeRef> {
        let token = self.current().clone();
        if token.text == "stream" {
            return Err(self.source.unsupported("streaming rpc", Some(token.span())));
        }
        let ty = self.type_ref()?;
        if matches!(ty, TypeRef::Scalar(_)) {
            return Err(self.source.semantic_error(
                "rpc request and response must be message types",
                Some(token.span()),
            ));
        }
        Ok(ty)
    }

    /// Consume a statement we do not model (option, reserved) up to its
    /// terminating ';'. Brace-valued options are skipped wholesale.
    fn skip_statement(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.bump().clone();
            if token.is_eof() {
                return Err(self
                    .source
                    .syntax_error("unterminated statement", Some(token.span())));
            }
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => depth = depth.saturating_sub(1),
                ";" if depth == 0 => return Ok(()),
                _ => {}
            }
        }
    }

    /// Consume a bracketed field-option list, '[' already eaten.
    fn skip_brackets(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            let token = self.bump().clone();
            if token.is_eof() {
                return Err(self
                    .source
                    .syntax_error("unterminated field options", Some(token.span())));
            }
            match token.text.as_str() {
                "[" => depth += 1,
                "]" => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Consume a brace-delimited body we do not model, '{' already eaten.
    fn skip_block(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            let token = self.bump().clone();
            if token.is_eof() {
                return Err(self
                    .source
                    .syntax_error("unterminated block", Some(token.span())));
            }
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Strip quotes and resolve simple escapes in a string lexeme.
fn unquote(lexeme: &str) -> String {
    let inner = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> SchemaFile {
        parse(src, Path::new("test.proto")).unwrap()
    }

    fn parse_err(src: &str) -> String {
        parse(src, Path::new("test.proto")).unwrap_err().to_string()
    }

    #[test]
    fn test_parse_empty_file() {
        let file = parse_ok("");
        assert_eq!(file.package, None);
        assert!(file.decls.is_empty());
    }

    #[test]
    fn test_parse_package_and_syntax() {
        let file = parse_ok("syntax = \"proto3\";\npackage a.b.c;\n");
        assert_eq!(file.package.as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_parse_simple_message() {
        let file = parse_ok(
            "message User {\n  string name = 1;\n  int32 age = 2;\n  repeated string tags = 3;\n  optional bool active = 4;\n}",
        );
        let message = file.messages().next().unwrap();
        assert_eq!(message.name, "User");
        assert_eq!(message.fields.len(), 4);
        assert_eq!(message.fields[0].ty, TypeRef::Scalar(ScalarType::String));
        assert_eq!(message.fields[0].tag, 1);
        assert_eq!(message.fields[0].cardinality, Cardinality::Singular);
        assert_eq!(message.fields[2].cardinality, Cardinality::Repeated);
        assert_eq!(message.fields[3].cardinality, Cardinality::Optional);
    }

    #[test]
    fn test_parse_message_type_reference() {
        let file = parse_ok("message Outer {\n  a.b.Inner inner = 1;\n}");
        let message = file.messages().next().unwrap();
        assert_eq!(
            message.fields[0].ty,
            TypeRef::Named("a.b.Inner".to_string())
        );
    }

    #[test]
    fn test_parse_leading_dot_is_normalized() {
        let file = parse_ok("message Outer {\n  .a.b.Inner inner = 1;\n}");
        let message = file.messages().next().unwrap();
        assert_eq!(
            message.fields[0].ty,
            TypeRef::Named("a.b.Inner".to_string())
        );
    }

    #[test]
    fn test_parse_nested_types() {
        let file = parse_ok(
            "message Outer {\n  message Inner {\n    int32 x = 1;\n  }\n  enum Kind {\n    KIND_UNKNOWN = 0;\n  }\n  Inner inner = 1;\n}",
        );
        let outer = file.messages().next().unwrap();
        assert_eq!(outer.messages.len(), 1);
        assert_eq!(outer.messages[0].name, "Inner");
        assert_eq!(outer.enums.len(), 1);
        assert_eq!(outer.enums[0].name, "Kind");
        assert!(outer.has_nested());
    }

    #[test]
    fn test_parse_imports() {
        let file = parse_ok(
            "import \"common/types.proto\";\nimport public \"shared.proto\";\nimport \"other.proto\";",
        );
        assert_eq!(file.imports, vec!["common/types.proto", "other.proto"]);
        assert_eq!(file.public_imports, vec!["shared.proto"]);
    }

    #[test]
    fn test_parse_enum() {
        let file = parse_ok(
            "enum Status {\n  STATUS_UNKNOWN = 0;\n  STATUS_ACTIVE = 1;\n  STATUS_RETIRED = -1;\n}",
        );
        let decl = file.enums().next().unwrap();
        assert_eq!(decl.values.len(), 3);
        assert_eq!(decl.values[0].number, 0);
        assert_eq!(decl.values[2].number, -1);
    }

    #[test]
    fn test_parse_service() {
        let file = parse_ok(
            "message Req {}\nmessage Res {}\nservice Greeter {\n  rpc Greet(Req) returns (Res);\n  rpc GreetAgain(Req) returns (Res) {\n    option idempotency_level = IDEMPOTENT;\n  }\n}",
        );
        let service = file.services().next().unwrap();
        assert_eq!(service.name, "Greeter");
        assert_eq!(service.rpcs.len(), 2);
        assert_eq!(service.rpcs[0].name, "Greet");
        assert_eq!(service.rpcs[0].request, TypeRef::Named("Req".to_string()));
    }

    #[test]
    fn test_parse_skips_options_and_reserved() {
        let file = parse_ok(
            "option java_package = \"com.example\";\nmessage Foo {\n  option deprecated = true;\n  reserved 2, 4 to 8;\n  reserved \"old_name\";\n  string name = 1 [json_name = \"n\"];\n}",
        );
        let message = file.messages().next().unwrap();
        assert_eq!(message.fields.len(), 1);
        assert_eq!(message.fields[0].name, "name");
    }

    #[test]
    fn test_parse_aggregate_option() {
        let file = parse_ok("option (custom) = {\n  key: \"value\";\n};\nmessage Foo {}");
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn test_parse_rejects_proto2() {
        let err = parse_err("syntax = \"proto2\";");
        assert!(err.contains("proto2"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_streaming_rpc() {
        let err = parse_err(
            "service S {\n  rpc Watch(Req) returns (stream Res);\n}",
        );
        assert!(err.contains("streaming rpc"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_map_field() {
        let err = parse_err("message Foo {\n  map<string, int32> labels = 1;\n}");
        assert!(err.contains("map field"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_oneof() {
        let err = parse_err("message Foo {\n  oneof kind {\n    int32 a = 1;\n  }\n}");
        assert!(err.contains("oneof"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_duplicate_tag() {
        let err = parse_err("message Foo {\n  int32 a = 1;\n  int32 b = 1;\n}");
        assert!(err.contains("already used"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_tag_zero() {
        let err = parse_err("message Foo {\n  int32 a = 0;\n}");
        assert!(err.contains("invalid field tag"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_reserved_tag_range() {
        let err = parse_err("message Foo {\n  int32 a = 19500;\n}");
        assert!(err.contains("invalid field tag"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_nonzero_first_enum_value() {
        let err = parse_err("enum Status {\n  STATUS_ACTIVE = 1;\n}");
        assert!(err.contains("must be zero"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_rejects_scalar_rpc_type() {
        let err = parse_err("service S {\n  rpc F(int32) returns (Res);\n}");
        assert!(err.contains("message types"), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_reports_position() {
        let err = parse(
            "message Foo {\n  string name 1;\n}",
            Path::new("broken.proto"),
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Syntax { .. }));
        assert!(err.to_string().contains("expected '='"));
    }

    #[test]
    fn test_parse_stray_semicolons() {
        let file = parse_ok(";;\nmessage Foo {};\n;");
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn test_parse_syntax_not_first_is_rejected() {
        let err = parse_err("package a;\nsyntax = \"proto3\";");
        assert!(err.contains("first statement"), "unexpected error: {err}");
    }
}
