//! Recursive-descent parser for the Bicep subset appgraph needs.
//!
//! Declarations (`param`, `var`, `resource`, `module`, `output`) are parsed
//! into a small AST. Values keep their structure where it matters for
//! extraction (objects, arrays, literals, dotted references) and fall back to
//! raw source text for anything with operators, calls or loops.

use crate::error::BicepError;
use crate::lexer::{Token, TokenKind, tokenize};

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub statements: Vec<Statement>,
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Param(ParamDecl),
    Var {
        name: String,
        value: Value,
        line: u32,
    },
    Resource(ResourceDecl),
    Module {
        name: String,
        path: String,
        body: Value,
        line: u32,
    },
    Output {
        name: String,
        value: Value,
        line: u32,
    },
    /// Any other statement (`targetScope`, `import`, `extension`, ...), skipped.
    Other { keyword: String, line: u32 },
}

/// `param <name> <type> [= <default>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub type_name: String,
    pub default: Option<Value>,
    pub line: u32,
}

/// `resource <symbolic> '<type>@<version>' [existing] = <body>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDecl {
    pub symbolic_name: String,
    pub type_string: String,
    pub existing: bool,
    pub body: Value,
    pub line: u32,
}

/// Property of an object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: Value,
    pub line: u32,
}

/// Bicep value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(i64),
    Bool(bool),
    Null,
    Object(Vec<Property>),
    Array(Vec<Value>),
    /// Dotted reference such as `backend.id` or `magpieimage`.
    Reference(Vec<String>),
    /// Anything else, as raw source text.
    Expression(String),
}

impl Value {
    /// Direct property of an object value.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(props) => props.iter().find(|p| p.key == key).map(|p| &p.value),
            _ => None,
        }
    }

    /// First property named `key` in depth-first order, at any nesting level.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Value> {
        let mut found = None;
        self.walk(&mut |prop| {
            if found.is_none() && prop.key == key {
                found = Some(&prop.value);
            }
        });
        found
    }

    /// Visit every property in depth-first order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Property)) {
        match self {
            Self::Object(props) => {
                for prop in props {
                    visit(prop);
                    prop.value.walk(visit);
                }
            }
            Self::Array(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Manifest {
    /// Parse Bicep source text.
    pub fn parse(source: &str) -> Result<Self, BicepError> {
        let tokens = tokenize(source)?;
        Parser {
            source,
            tokens,
            pos: 0,
        }
        .parse_manifest()
    }

    /// Parameter declarations.
    pub fn params(&self) -> impl Iterator<Item = &ParamDecl> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Param(p) => Some(p),
            _ => None,
        })
    }

    /// Resource declarations.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDecl> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Resource(r) => Some(r),
            _ => None,
        })
    }

    /// Default value of a `string` parameter, if it is a literal.
    #[must_use]
    pub fn string_param_default(&self, name: &str) -> Option<&str> {
        self.params()
            .find(|p| p.name == name && p.type_name == "string")
            .and_then(|p| p.default.as_ref())
            .and_then(Value::as_str)
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof, and advance() never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn previous_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .map_or(0, |i| self.tokens[i].end)
    }

    fn error(token: &Token, message: impl Into<String>) -> BicepError {
        BicepError::Parse {
            line: token.line,
            message: message.into(),
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.pos += 1;
        }
    }

    fn expect_symbol(&mut self, symbol: &str) -> Result<(), BicepError> {
        let token = self.advance();
        if token.is_symbol(symbol) {
            Ok(())
        } else {
            Err(Self::error(
                &token,
                format!("expected '{symbol}', found {}", describe(&token)),
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, BicepError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(Self::error(
                &token,
                format!("expected {what}, found {}", describe(&token)),
            )),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, BicepError> {
        let token = self.advance();
        match token.kind {
            TokenKind::String(value) => Ok(value),
            _ => Err(Self::error(
                &token,
                format!("expected {what}, found {}", describe(&token)),
            )),
        }
    }

    fn parse_manifest(mut self) -> Result<Manifest, BicepError> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.peek().kind == TokenKind::Eof {
                break;
            }
            if self.peek().is_symbol("@") {
                self.parse_decorator()?;
                continue;
            }
            statements.push(self.parse_statement()?);
            self.skip_to_line_end();
        }

        Ok(Manifest { statements })
    }

    /// `@name(...)` before a declaration; parsed and discarded.
    fn parse_decorator(&mut self) -> Result<(), BicepError> {
        self.expect_symbol("@")?;
        self.parse_primary()?;
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<Statement, BicepError> {
        let token = self.advance();
        let line = token.line;
        let TokenKind::Ident(keyword) = token.kind else {
            return Err(Self::error(
                &token,
                format!("expected declaration, found {}", describe(&token)),
            ));
        };

        match keyword.as_str() {
            "param" => {
                let name = self.expect_ident("parameter name")?;
                let type_name = self.parse_type()?;
                let default = if self.peek().is_symbol("=") {
                    self.advance();
                    Some(self.parse_value()?)
                } else {
                    None
                };
                Ok(Statement::Param(ParamDecl {
                    name,
                    type_name,
                    default,
                    line,
                }))
            }
            "var" => {
                let name = self.expect_ident("variable name")?;
                self.expect_symbol("=")?;
                let value = self.parse_value()?;
                Ok(Statement::Var { name, value, line })
            }
            "resource" => {
                let symbolic_name = self.expect_ident("resource symbolic name")?;
                let type_string = self.expect_string("resource type")?;
                let existing = self.peek().is_ident("existing");
                if existing {
                    self.advance();
                }
                self.expect_symbol("=")?;
                let body = self.parse_declaration_body(&symbolic_name)?;
                Ok(Statement::Resource(ResourceDecl {
                    symbolic_name,
                    type_string,
                    existing,
                    body,
                    line,
                }))
            }
            "module" => {
                let name = self.expect_ident("module symbolic name")?;
                let path = self.expect_string("module path")?;
                self.expect_symbol("=")?;
                let body = self.parse_declaration_body(&name)?;
                Ok(Statement::Module {
                    name,
                    path,
                    body,
                    line,
                })
            }
            "output" => {
                let name = self.expect_ident("output name")?;
                self.parse_type()?;
                self.expect_symbol("=")?;
                let value = self.parse_value()?;
                Ok(Statement::Output { name, value, line })
            }
            _ => Ok(Statement::Other { keyword, line }),
        }
    }

    /// Type annotation: `string`, `string[]`, `resource 'T@v'`, or an object type.
    fn parse_type(&mut self) -> Result<String, BicepError> {
        let token = self.peek().clone();
        let type_name = match &token.kind {
            TokenKind::Ident(name) if name == "resource" => {
                self.advance();
                let ty = self.expect_string("resource type")?;
                format!("resource '{ty}'")
            }
            TokenKind::Ident(name) => {
                self.advance();
                name.clone()
            }
            TokenKind::Symbol("{") => {
                self.skip_balanced();
                "object".to_owned()
            }
            _ => {
                return Err(Self::error(
                    &token,
                    format!("expected type, found {}", describe(&token)),
                ));
            }
        };

        if self.peek().is_symbol("[") && self.peek_nth(1).is_symbol("]") {
            self.advance();
            self.advance();
            return Ok(format!("{type_name}[]"));
        }
        Ok(type_name)
    }

    /// Body of a `resource`/`module`: an object, `if (cond) {...}`, or a `for` loop.
    fn parse_declaration_body(&mut self, name: &str) -> Result<Value, BicepError> {
        if self.peek().is_ident("if") {
            self.advance();
            if !self.peek().is_symbol("(") {
                let token = self.peek().clone();
                return Err(Self::error(&token, "expected '(' after 'if'"));
            }
            self.skip_balanced();
            return self.parse_value();
        }

        if self.peek().is_symbol("[") && self.peek_nth(1).is_ident("for") {
            tracing::warn!(resource = name, "Skipping loop declaration");
        }
        self.parse_value()
    }

    /// Consume the rest of the current line at bracket depth zero.
    fn skip_to_line_end(&mut self) {
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Newline | TokenKind::Eof => return,
                TokenKind::Symbol("{" | "[" | "(") => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Consume a bracketed group starting at the current opening bracket.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Symbol("{" | "[" | "(") => depth += 1,
                TokenKind::Symbol("}" | "]" | ")") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::Eof => return,
                _ => {}
            }
        }
    }

    /// Parse a value, collapsing operator expressions into raw text.
    fn parse_value(&mut self) -> Result<Value, BicepError> {
        let start = self.peek().start;
        let primary = self.parse_primary()?;

        if !self.at_operator() {
            return Ok(primary);
        }

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Newline
                | TokenKind::Eof
                | TokenKind::Symbol("," | "}" | "]" | ")") => break,
                TokenKind::Symbol("{" | "[" | "(") => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }

        Ok(Value::Expression(
            self.source[start..self.previous_end()].trim().to_owned(),
        ))
    }

    fn at_operator(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Symbol(
                "?" | "??" | "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" | "+" | "-" | "*"
                    | "/" | "%" | "=~" | "!~" | "|" | "&"
            )
        )
    }

    fn parse_primary(&mut self) -> Result<Value, BicepError> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok(Value::String(value))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Value::Number(n))
            }
            TokenKind::Ident(ref name) if name == "true" || name == "false" => {
                self.advance();
                Ok(Value::Bool(name == "true"))
            }
            TokenKind::Ident(ref name) if name == "null" => {
                self.advance();
                Ok(Value::Null)
            }
            TokenKind::Ident(_) => Ok(self.parse_reference()),
            TokenKind::Symbol("{") => self.parse_object(),
            TokenKind::Symbol("[") => {
                if self.peek_nth(1).is_ident("for") {
                    self.skip_balanced();
                    return Ok(self.raw_since(token.start));
                }
                self.parse_array()
            }
            TokenKind::Symbol("(") => {
                self.skip_balanced();
                Ok(self.raw_since(token.start))
            }
            TokenKind::Symbol("!" | "-") => {
                self.advance();
                self.parse_primary()?;
                Ok(self.raw_since(token.start))
            }
            _ => Err(Self::error(
                &token,
                format!("expected value, found {}", describe(&token)),
            )),
        }
    }

    fn raw_since(&self, start: usize) -> Value {
        Value::Expression(self.source[start..self.previous_end()].to_owned())
    }

    /// Identifier chain with member access, calls and indexers.
    ///
    /// Pure dotted paths become [`Value::Reference`]; anything with a call or
    /// index becomes [`Value::Expression`].
    fn parse_reference(&mut self) -> Value {
        let start = self.peek().start;
        let mut segments = Vec::new();
        let mut plain = true;

        if let TokenKind::Ident(name) = self.advance().kind {
            segments.push(name);
        }

        loop {
            let token = self.peek();
            if token.is_symbol(".") || token.is_symbol(".?") || token.is_symbol("::") {
                if let TokenKind::Ident(name) = &self.peek_nth(1).kind {
                    let name = name.clone();
                    self.advance();
                    self.advance();
                    segments.push(name);
                    continue;
                }
                break;
            }
            if token.is_symbol("(") || token.is_symbol("[") {
                self.skip_balanced();
                plain = false;
                continue;
            }
            break;
        }

        if plain {
            Value::Reference(segments)
        } else {
            self.raw_since(start)
        }
    }

    fn parse_object(&mut self) -> Result<Value, BicepError> {
        self.expect_symbol("{")?;
        let mut props = Vec::new();

        loop {
            self.skip_newlines();
            let token = self.peek().clone();
            match &token.kind {
                TokenKind::Symbol("}") => {
                    self.advance();
                    return Ok(Value::Object(props));
                }
                TokenKind::Symbol(",") => {
                    self.advance();
                }
                TokenKind::Symbol("@") => self.parse_decorator()?,
                TokenKind::Ident(keyword)
                    if keyword == "resource" && !self.peek_nth(1).is_symbol(":") =>
                {
                    self.skip_nested_resource()?;
                }
                TokenKind::Ident(key) | TokenKind::String(key) => {
                    self.advance();
                    self.expect_symbol(":")?;
                    let value = self.parse_value()?;
                    props.push(Property {
                        key: key.clone(),
                        value,
                        line: token.line,
                    });
                }
                TokenKind::Eof => return Err(Self::error(&token, "unterminated object")),
                _ => {
                    return Err(Self::error(
                        &token,
                        format!("expected property name, found {}", describe(&token)),
                    ));
                }
            }
        }
    }

    /// Child `resource` declared inside a parent body. Only top-level
    /// declarations become resources, so the child is consumed and dropped.
    fn skip_nested_resource(&mut self) -> Result<(), BicepError> {
        self.advance();
        let name = self.expect_ident("resource symbolic name")?;
        self.expect_string("resource type")?;
        if self.peek().is_ident("existing") {
            self.advance();
        }
        self.expect_symbol("=")?;
        self.parse_declaration_body(&name)?;
        tracing::debug!(resource = %name, "Skipping nested resource");
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Value, BicepError> {
        self.expect_symbol("[")?;
        let mut items = Vec::new();

        loop {
            self.skip_newlines();
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Symbol("]") => {
                    self.advance();
                    return Ok(Value::Array(items));
                }
                TokenKind::Symbol(",") => {
                    self.advance();
                }
                TokenKind::Eof => return Err(Self::error(&token, "unterminated array")),
                _ => items.push(self.parse_value()?),
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::Ident(name) => format!("'{name}'"),
        TokenKind::String(_) => "string".to_owned(),
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::Symbol(s) => format!("'{s}'"),
        TokenKind::Newline => "end of line".to_owned(),
        TokenKind::Eof => "end of file".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Manifest {
        Manifest::parse(source).unwrap()
    }

    fn only_resource(manifest: &Manifest) -> &ResourceDecl {
        let resources: Vec<_> = manifest.resources().collect();
        assert_eq!(resources.len(), 1);
        resources[0]
    }

    #[test]
    fn test_parse_param_with_default() {
        let manifest = parse("param magpieimage string = 'ghcr.io/radius/magpie:latest'");
        assert_eq!(
            manifest.string_param_default("magpieimage"),
            Some("ghcr.io/radius/magpie:latest")
        );
    }

    #[test]
    fn test_parse_param_without_default() {
        let manifest = parse("@description('The env')\nparam environment string");
        let params: Vec<_> = manifest.params().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "environment");
        assert!(params[0].default.is_none());
        assert_eq!(manifest.string_param_default("environment"), None);
    }

    #[test]
    fn test_parse_array_type_param() {
        let manifest = parse("param names string[] = [\n  'a'\n  'b'\n]");
        let param = manifest.params().next().unwrap();
        assert_eq!(param.type_name, "string[]");
        assert_eq!(
            param.default,
            Some(Value::Array(vec![
                Value::String("a".to_owned()),
                Value::String("b".to_owned())
            ]))
        );
    }

    #[test]
    fn test_parse_resource() {
        let source = "\
extension radius

resource frontend 'Applications.Core/containers@2023-10-01-preview' = {
  name: 'frontend'
  properties: {
    application: app.id
    container: {
      image: 'nginx:alpine'
      ports: {
        web: {
          containerPort: 80
        }
      }
    }
  }
}
";
        let manifest = parse(source);
        let resource = only_resource(&manifest);

        assert_eq!(resource.symbolic_name, "frontend");
        assert_eq!(
            resource.type_string,
            "Applications.Core/containers@2023-10-01-preview"
        );
        assert_eq!(resource.line, 3);
        assert!(!resource.existing);
        assert_eq!(
            resource.body.property("name"),
            Some(&Value::String("frontend".to_owned()))
        );
        assert_eq!(
            resource.body.find("image"),
            Some(&Value::String("nginx:alpine".to_owned()))
        );
        assert_eq!(resource.body.find("containerPort"), Some(&Value::Number(80)));
        assert_eq!(
            resource.body.find("application"),
            Some(&Value::Reference(vec!["app".to_owned(), "id".to_owned()]))
        );
    }

    #[test]
    fn test_nested_braces_do_not_end_resource() {
        // A closing brace at column zero inside a nested value used to confuse
        // line-oriented matching; the parser tracks nesting instead.
        let source = "\
resource a 'T/containers@1' = {
  name: 'a'
  properties: { x: {
}
  }
}
resource b 'T/containers@1' = {
  name: 'b'
}
";
        let manifest = parse(source);
        let names: Vec<_> = manifest
            .resources()
            .map(|r| r.symbolic_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_existing_resource() {
        let manifest = parse("resource env 'Applications.Core/environments@2023-10-01-preview' existing = {\n  name: 'default'\n}");
        assert!(only_resource(&manifest).existing);
    }

    #[test]
    fn test_conditional_resource() {
        let manifest = parse("resource cache 'Applications.Datastores/redisCaches@2023-10-01-preview' = if (deployCache) {\n  name: 'cache'\n}");
        let resource = only_resource(&manifest);
        assert_eq!(resource.body.property("name").and_then(Value::as_str), Some("cache"));
    }

    #[test]
    fn test_loop_resource_is_expression() {
        let manifest = parse("resource workers 'Applications.Core/containers@2023-10-01-preview' = [for i in range(0, 3): {\n  name: 'worker-${i}'\n}]");
        let resource = only_resource(&manifest);
        assert!(matches!(resource.body, Value::Expression(_)));
    }

    #[test]
    fn test_expressions_are_captured_raw() {
        let manifest = parse("var replicas = isProd ? 3 : 1\nvar url = 'http://${host}:${port}'\nvar id = resourceId('x', 'y')");
        let values: Vec<_> = manifest
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Var { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![
                Value::Expression("isProd ? 3 : 1".to_owned()),
                Value::String("http://${host}:${port}".to_owned()),
                Value::Expression("resourceId('x', 'y')".to_owned()),
            ]
        );
    }

    #[test]
    fn test_multiline_call_in_object() {
        let source = "\
resource db 'Applications.Datastores/sqlDatabases@2023-10-01-preview' = {
  name: 'db'
  properties: union(base, {
    x: 1
  })
  tags: {}
}
";
        let manifest = parse(source);
        let resource = only_resource(&manifest);
        assert!(matches!(
            resource.body.property("properties"),
            Some(Value::Expression(_))
        ));
        assert_eq!(resource.body.property("tags"), Some(&Value::Object(vec![])));
    }

    #[test]
    fn test_other_statements_are_skipped() {
        let manifest = parse("targetScope = 'resourceGroup'\nimport radius as radius\noutput url string = frontend.properties.url\nmodule m './m.bicep' = {\n  name: 'm'\n}");
        assert!(matches!(manifest.statements[0], Statement::Other { ref keyword, .. } if keyword == "targetScope"));
        assert!(matches!(manifest.statements[1], Statement::Other { ref keyword, .. } if keyword == "import"));
        assert!(matches!(manifest.statements[2], Statement::Output { .. }));
        assert!(matches!(manifest.statements[3], Statement::Module { ref path, .. } if path == "./m.bicep"));
    }

    #[test]
    fn test_comma_separated_object() {
        let manifest = parse("var o = { a: 1, b: 'x' }");
        let Statement::Var { value, .. } = &manifest.statements[0] else {
            panic!("expected var");
        };
        assert_eq!(value.property("a"), Some(&Value::Number(1)));
        assert_eq!(value.property("b").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn test_quoted_property_keys() {
        let manifest = parse("var o = {\n  'my-key': true\n}");
        let Statement::Var { value, .. } = &manifest.statements[0] else {
            panic!("expected var");
        };
        assert_eq!(value.property("my-key"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_unterminated_object_is_error() {
        let err = Manifest::parse("resource a 'T@1' = {\n  name: 'a'\n").unwrap_err();
        assert!(matches!(err, BicepError::Parse { .. }));
        assert!(err.to_string().contains("unterminated object"));
    }

    #[test]
    fn test_nested_resource_is_skipped() {
        let manifest = parse(
            "resource parent 'Microsoft.Foo/foos@2023-01-01' = {\n  name: 'p'\n  resource child 'Microsoft.Foo/bars@2023-01-01' = {\n    name: 'c'\n  }\n  resource other 'bars' existing = {\n    name: 'o'\n  }\n  properties: {\n    resource: 'kept'\n  }\n}",
        );
        let resource = only_resource(&manifest);
        assert_eq!(resource.symbolic_name, "parent");
        assert_eq!(resource.body.property("name").and_then(Value::as_str), Some("p"));
        let Some(Value::Object(props)) = resource.body.property("properties") else {
            panic!("expected properties object");
        };
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].key, "resource");
    }

    #[test]
    fn test_missing_colon_is_error() {
        let err = Manifest::parse("var o = {\n  name 'a'\n}").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("expected ':'"));
    }

    #[test]
    fn test_walk_visits_nested_properties() {
        let manifest = parse("var o = {\n  a: {\n    b: [ { c: 1 } ]\n  }\n}");
        let Statement::Var { value, .. } = &manifest.statements[0] else {
            panic!("expected var");
        };
        let mut keys = Vec::new();
        value.walk(&mut |p| keys.push(p.key.clone()));
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
