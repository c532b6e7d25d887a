//! Declaration parsing, including identifier-led declarations

use super::{Container, ParseContext, Parser};
use crate::ast::visitor::{walk_expression_mut, walk_statement_mut, walk_type_mut, VisitorMut};
use crate::ast::*;
use crate::debug_println;
use crate::error::{ErrorKind, SourceLocation, Span};
use crate::lexer::{LiteralValue, TokenKind};
use nonempty::NonEmpty;

/// Gives every node of a duplicated subtree a fresh id
struct Restamp<'a> {
    next_id: &'a mut u32,
}

impl Restamp<'_> {
    fn fresh(&mut self) -> NodeId {
        let id = NodeId(*self.next_id);
        *self.next_id += 1;
        id
    }
}

impl VisitorMut for Restamp<'_> {
    fn visit_statement_mut(&mut self, stmt: &mut LocatedStmt) {
        stmt.id = self.fresh();
        walk_statement_mut(self, stmt);
    }

    fn visit_expression_mut(&mut self, expr: &mut LocatedExpr) {
        expr.id = self.fresh();
        walk_expression_mut(self, expr);
    }

    fn visit_type_mut(&mut self, ty: &mut LocatedType) {
        ty.id = self.fresh();
        walk_type_mut(self, ty);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Qualifiers {
    is_const: bool,
    is_volatile: bool,
}

/// Shape of an identifier-led declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaratorForm {
    /// `Type name`, including pointer and array types
    Named,
    /// `Type{} name` and `Type(args){} name`
    Instantiation,
}

/// Types that name something without further structure; after such a type
/// an identifier always means a declaration
fn is_simple_type(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Named(_) | Type::Qualified(_) | Type::Builtin(_) | Type::Data(_)
    )
}

impl Parser {
    /// Parse a declaration if the current tokens start one. `None` means
    /// nothing was consumed and the caller should try a statement.
    pub(super) fn parse_declaration(&mut self, ctx: ParseContext) -> Option<NonEmpty<LocatedDecl>> {
        let next = self.peek_at(1).kind;
        let decl = match self.peek().kind {
            TokenKind::Namespace => self.parse_namespace(ctx),
            TokenKind::Class | TokenKind::Object if next == TokenKind::Identifier => {
                self.parse_class_or_object(ctx)
            }
            TokenKind::Struct if next == TokenKind::Identifier => self.parse_struct(),
            TokenKind::Def if next == TokenKind::Identifier => self.parse_function(ctx),
            TokenKind::Operator => self.parse_operator(ctx),
            TokenKind::Import => self.parse_import(),
            TokenKind::Using => self.parse_using(),
            TokenKind::Template => return Some(self.parse_template(ctx)),
            TokenKind::Enum => self.parse_enum(),
            TokenKind::Type => self.parse_type_alias(),
            TokenKind::Asm => {
                let start = self.start_location();
                let raw = self.parse_asm_body();
                self.node(Declaration::Asm(raw), start)
            }
            TokenKind::Data | TokenKind::Signed | TokenKind::Unsigned
                if self.is_data_declaration() =>
            {
                self.parse_data_declaration()
            }
            TokenKind::Const
            | TokenKind::Volatile
            | TokenKind::Auto
            | TokenKind::Void
            | TokenKind::Data
            | TokenKind::Signed
            | TokenKind::Unsigned
            | TokenKind::Class
            | TokenKind::Object
            | TokenKind::Struct
            | TokenKind::Def => return Some(self.parse_variable_declaration()),
            TokenKind::Identifier => return self.parse_identifier_led_declaration(),
            _ => return None,
        };
        Some(NonEmpty::new(decl))
    }

    /// `{ members }` of a namespace, class or object
    fn parse_member_body(&mut self, ctx: ParseContext, what: &str) -> Vec<LocatedDecl> {
        let mut members = Vec::new();
        self.consume(TokenKind::LeftBrace, &format!("Expected '{{' before {} body", what));
        if !self.descend() {
            return members;
        }

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }

            let before = self.current;
            match self.parse_declaration(ctx) {
                Some(decls) => members.extend(decls),
                None => {
                    let span = self.peek().span;
                    let message = format!(
                        "Expected declaration in {} body, found {}",
                        what,
                        super::error::describe_token(self.peek())
                    );
                    self.report(ErrorKind::ExpectedDeclaration, message, span);
                }
            }
            self.recover_after_item(before);
        }

        self.ascend();
        self.consume(TokenKind::RightBrace, &format!("Expected '}}' after {} body", what));
        members
    }

    fn parse_namespace(&mut self, ctx: ParseContext) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let name = self.consume_identifier("Expected namespace name");

        let members = if self.check(TokenKind::LeftBrace) {
            let members = self.parse_member_body(ctx.container(Container::Namespace), "namespace");
            self.match_token(TokenKind::Semicolon);
            members
        } else {
            self.error_at_current("Expected '{' after namespace name");
            Vec::new()
        };

        self.node(Declaration::Namespace(NamespaceDecl { name, members }), start)
    }

    /// `class Name [: Base, !Excluded] { members }`, `object Name [: Base] { members }`
    /// and their forward forms
    fn parse_class_or_object(&mut self, ctx: ParseContext) -> LocatedDecl {
        let start = self.start_location();
        let is_class = self.advance().kind == TokenKind::Class;
        let name = self.consume_identifier("Expected type name");

        let mut base_list = Vec::new();
        let mut exclusion_list = Vec::new();
        if self.match_token(TokenKind::Colon) {
            loop {
                let entry_start = self.start_location();
                let excluded = self.match_token(TokenKind::Bang);
                let base = self.parse_qualified_name("Expected base name");
                if !excluded {
                    base_list.push(base);
                } else if is_class {
                    exclusion_list.push(base);
                } else {
                    let span = self.span_from(entry_start);
                    self.report_structural(
                        ErrorKind::InvalidExclusion,
                        format!("Objects cannot exclude members of '{}'", base),
                        span,
                    );
                }
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let is_forward = self.match_token(TokenKind::Semicolon);
        let members = if is_forward {
            Vec::new()
        } else if is_class {
            self.parse_member_body(ctx.container(Container::Class), "class")
        } else {
            self.parse_member_body(ctx.container(Container::Object), "object")
        };
        if !is_forward {
            self.match_token(TokenKind::Semicolon);
        }

        let decl = if is_class {
            Declaration::Class(ClassDecl {
                name,
                base_list,
                exclusion_list,
                members,
                is_forward,
            })
        } else {
            Declaration::Object(ObjectDecl {
                name,
                base_list,
                members,
                is_forward,
            })
        };
        self.node(decl, start)
    }

    fn parse_struct(&mut self) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let name = self.consume_identifier("Expected struct name");

        if self.match_token(TokenKind::Semicolon) {
            return self.node(
                Declaration::Struct(StructDecl {
                    name,
                    fields: Vec::new(),
                    is_forward: true,
                }),
                start,
            );
        }

        let mut fields = Vec::new();
        self.consume(TokenKind::LeftBrace, "Expected '{' or ';' after struct name");
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }

            let before = self.current;
            self.parse_struct_fields(&mut fields);
            self.recover_after_item(before);
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after struct fields");
        self.match_token(TokenKind::Semicolon);

        self.node(
            Declaration::Struct(StructDecl {
                name,
                fields,
                is_forward: false,
            }),
            start,
        )
    }

    /// `Type a;` or `Type b, c;`
    fn parse_struct_fields(&mut self, fields: &mut Vec<StructField>) {
        let start = self.start_location();
        let field_type = self.parse_type();
        let name = self.consume_identifier("Expected field name");
        fields.push(StructField {
            field_type: field_type.clone(),
            name,
            span: self.span_from(start),
        });

        while self.match_token(TokenKind::Comma) {
            let name = self.consume_identifier("Expected field name after ','");
            let field_type = self.duplicate_type(&field_type);
            fields.push(StructField {
                field_type,
                name,
                span: self.span_from(start),
            });
        }
        self.expect_semicolon("struct field");
    }

    /// `def name(params) [-> Ret] { body }` or a prototype ending in `;`
    fn parse_function(&mut self, ctx: ParseContext) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let name = self.consume_identifier("Expected function name");
        let params = self.parse_parameters();
        let return_type = self.parse_return_type();

        let mut function = FunctionDecl::prototype(name, params, return_type);
        if self.check(TokenKind::LeftBrace) {
            let body = self.parse_block(ctx.function_body());
            function.attach_body(body);
        } else if !self.match_token(TokenKind::Semicolon) {
            self.error_at_current("Expected '{' or ';' after function signature");
        }

        let decl = self.node(Declaration::Function(function), start);
        if ctx.container == Container::Class {
            self.report_structural(
                ErrorKind::FunctionInClass,
                "Functions cannot be defined in a class; use an object",
                decl.span,
            );
        }
        decl
    }

    /// `(Type a, Type b)`
    fn parse_parameters(&mut self) -> Vec<Parameter> {
        let mut params = Vec::new();
        self.consume(TokenKind::LeftParen, "Expected '(' before parameters");
        if !self.check(TokenKind::RightParen) {
            loop {
                let start = self.start_location();
                let param_type = self.parse_type();
                let name = self.consume_identifier("Expected parameter name");
                params.push(Parameter {
                    name,
                    param_type,
                    span: self.span_from(start),
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after parameters");
        params
    }

    /// `operator(Type a, Type b)[symbol] -> Ret { body }`
    fn parse_operator(&mut self, ctx: ParseContext) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let params = self.parse_parameters();

        self.consume(TokenKind::LeftBracket, "Expected '[' before operator symbol");
        let symbol = if self.check(TokenKind::RightBracket) || self.is_at_end() {
            self.error_at_current("Expected operator symbol");
            String::new()
        } else {
            self.advance().lexeme.clone()
        };
        self.consume(TokenKind::RightBracket, "Expected ']' after operator symbol");

        let return_type = self.parse_return_type();
        let body = self.parse_block(ctx.function_body());
        self.node(
            Declaration::Operator(OperatorDecl {
                symbol,
                params,
                return_type,
                body,
            }),
            start,
        )
    }

    /// `import "path" [as alias];`
    fn parse_import(&mut self) -> LocatedDecl {
        let start = self.start_location();
        self.advance();

        let path = if self.check(TokenKind::StringLiteral) {
            let token = self.advance();
            match &token.literal {
                Some(LiteralValue::String(path)) => path.clone(),
                _ => token.lexeme.trim_matches('"').to_string(),
            }
        } else {
            self.error_at_current("Expected import path string");
            String::new()
        };

        let alias = if self.match_token(TokenKind::As) {
            Some(self.consume_identifier("Expected alias after 'as'"))
        } else {
            None
        };
        self.expect_semicolon("import");
        self.node(Declaration::Import(ImportDecl { path, alias }), start)
    }

    fn parse_using(&mut self) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let path = self.parse_qualified_name("Expected namespace path after 'using'");
        self.expect_semicolon("using");
        self.node(Declaration::Using(path), start)
    }

    /// `template <T, U> declaration`; a declaration with several declarators
    /// yields one template per declarator
    fn parse_template(&mut self, ctx: ParseContext) -> NonEmpty<LocatedDecl> {
        let start = self.start_location();
        self.advance();

        let mut type_params = Vec::new();
        self.consume(TokenKind::Less, "Expected '<' after 'template'");
        if !self.check_any(&[TokenKind::Greater, TokenKind::Shr]) {
            loop {
                type_params.push(self.consume_identifier("Expected template parameter name"));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume_closing_angle("Expected '>' after template parameters");

        // Templates may prefix templates
        let inner = if self.descend() {
            let inner = self.parse_declaration(ctx);
            self.ascend();
            inner
        } else {
            None
        };
        let inner = match inner {
            Some(decls) => decls,
            None => {
                let span = self.peek().span;
                let message = format!(
                    "Expected declaration after template parameters, found {}",
                    super::error::describe_token(self.peek())
                );
                self.report(ErrorKind::ExpectedDeclaration, message, span);
                let span = self.empty_span();
                let expr = self.node_with_span(Expr::Placeholder, span);
                let stmt = self.node_with_span(Stmt::Expression(expr), span);
                NonEmpty::new(self.node_with_span(Declaration::Statement(Box::new(stmt)), span))
            }
        };

        let span = self.span_from(start);
        let NonEmpty { head, tail } = inner;
        let first = self.wrap_template(&type_params, head, span);
        let mut templates = NonEmpty::new(first);
        for decl in tail {
            let template = self.wrap_template(&type_params, decl, span);
            templates.push(template);
        }
        templates
    }

    fn wrap_template(&mut self, type_params: &[String], inner: LocatedDecl, span: Span) -> LocatedDecl {
        self.node_with_span(
            Declaration::Template(TemplateDecl {
                type_params: type_params.to_vec(),
                inner: Box::new(inner),
            }),
            span,
        )
    }

    /// `enum Name { A, B = 2, C } [;]`
    fn parse_enum(&mut self) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let name = self.consume_identifier("Expected enum name");

        let mut members = Vec::new();
        self.consume(TokenKind::LeftBrace, "Expected '{' after enum name");
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let member_start = self.start_location();
            let member_name = self.consume_identifier("Expected enum member name");
            let value = if self.match_token(TokenKind::Equal) {
                Some(self.parse_expression())
            } else {
                None
            };
            members.push(EnumMember {
                name: member_name,
                value,
                span: self.span_from(member_start),
            });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after enum members");
        self.match_token(TokenKind::Semicolon);

        self.node(Declaration::Enum(EnumDecl { name, members }), start)
    }

    /// `type Name = Type;`
    fn parse_type_alias(&mut self) -> LocatedDecl {
        let start = self.start_location();
        self.advance();
        let name = self.consume_identifier("Expected type alias name");
        self.consume(TokenKind::Equal, "Expected '=' after type alias name");
        let underlying = self.parse_type();
        self.expect_semicolon("type alias");
        self.node(Declaration::TypeAlias(TypeAliasDecl { name, underlying }), start)
    }

    /// `[signed|unsigned] data{N} as` lies ahead
    fn is_data_declaration(&self) -> bool {
        let offset = match self.peek().kind {
            TokenKind::Signed | TokenKind::Unsigned => 1,
            _ => 0,
        };
        self.peek_at(offset).kind == TokenKind::Data
            && self.peek_at(offset + 1).kind == TokenKind::LeftBrace
            && self.peek_at(offset + 3).kind == TokenKind::RightBrace
            && self.peek_at(offset + 4).kind == TokenKind::As
    }

    /// `[signed|unsigned] data{N} as Name;`
    fn parse_data_declaration(&mut self) -> LocatedDecl {
        let start = self.start_location();
        let data = self.parse_data_type();
        self.consume(TokenKind::As, "Expected 'as' after data type");
        let name = self.consume_identifier("Expected data type name");
        self.expect_semicolon("data type declaration");
        self.node(
            Declaration::Data(DataDecl {
                name,
                bit_width: data.bit_width,
                is_signed: data.is_signed,
            }),
            start,
        )
    }

    /// Keyword-led variable declaration: `[const] [volatile] Type a [= init], ...;`
    fn parse_variable_declaration(&mut self) -> NonEmpty<LocatedDecl> {
        let start = self.start_location();
        let mut qualifiers = Qualifiers::default();
        while let Some(kind) = self.match_any(&[TokenKind::Const, TokenKind::Volatile]) {
            match kind {
                TokenKind::Const => qualifiers.is_const = true,
                _ => qualifiers.is_volatile = true,
            }
        }

        let var_type = self.parse_type();
        let name = self.consume_identifier("Expected variable name");
        let var_type = self.finish_function_pointer(var_type);
        self.finish_variable_declaration(start, qualifiers, var_type, name, None)
    }

    /// Declaration starting with an identifier: `Type name`, `Type* name`,
    /// `Type[N] name`, `Type{} name` or `Type(args){} name`. The form is
    /// decided by a token skim first; when none fits, nothing is consumed
    /// and `None` is returned.
    fn parse_identifier_led_declaration(&mut self) -> Option<NonEmpty<LocatedDecl>> {
        let start = self.start_location();
        let plain = Qualifiers::default();

        let form = match self.declarator_form() {
            Some(form) => form,
            None => {
                debug_println!(
                    "[parser] no declaration at {}, retrying as a statement",
                    super::error::describe_token(self.peek())
                );
                return None;
            }
        };

        let checkpoint = self.checkpoint();
        let var_type = self.parse_type();
        match form {
            DeclaratorForm::Named => {
                let name = self.consume_identifier("Expected variable name");
                let var_type = self.finish_function_pointer(var_type);
                self.commit(&checkpoint, "declaration");
                Some(self.finish_variable_declaration(start, plain, var_type, name, None))
            }
            DeclaratorForm::Instantiation => {
                let args = if self.match_token(TokenKind::LeftParen) {
                    let args = self.parse_arguments(TokenKind::RightParen);
                    self.consume(TokenKind::RightParen, "Expected ')' after instantiation arguments");
                    args
                } else {
                    Vec::new()
                };
                self.consume(TokenKind::LeftBrace, "Expected '{' in instantiation");
                self.consume(TokenKind::RightBrace, "Expected '}' in instantiation");
                let name = self.consume_identifier("Expected variable name");
                self.commit(&checkpoint, "instantiation");
                Some(self.finish_variable_declaration(
                    start,
                    plain,
                    var_type,
                    name,
                    Some(Instantiation { args }),
                ))
            }
        }
    }

    /// Skim the type ahead and report which declaration form follows it.
    /// The cursor is always restored.
    fn declarator_form(&mut self) -> Option<DeclaratorForm> {
        let checkpoint = self.checkpoint();
        let var_type = self.skim_type();

        let form = if !self.probe_clean(&checkpoint) {
            None
        } else if self.check(TokenKind::Identifier) && self.declarator_follows(&var_type.node) {
            Some(DeclaratorForm::Named)
        } else if self.instantiation_follows() {
            Some(DeclaratorForm::Instantiation)
        } else {
            None
        };

        self.rewind(checkpoint);
        form
    }

    /// Whether the token after the declared name continues a declaration
    fn declarator_follows(&self, ty: &Type) -> bool {
        match self.peek_at(1).kind {
            TokenKind::Semicolon | TokenKind::Equal | TokenKind::Comma => true,
            TokenKind::LeftParen => matches!(ty, Type::Pointer(_)),
            _ => is_simple_type(ty),
        }
    }

    /// `{} name` or `(...){} name` ahead; the arguments are skipped unparsed
    fn instantiation_follows(&mut self) -> bool {
        if self.match_token(TokenKind::LeftParen) {
            self.skip_group();
            if !self.match_token(TokenKind::RightParen) {
                return false;
            }
        }
        self.check(TokenKind::LeftBrace)
            && self.peek_at(1).kind == TokenKind::RightBrace
            && self.peek_at(2).kind == TokenKind::Identifier
    }

    /// `R* name(P1, P2)` declares a pointer to a function; the parameter
    /// types follow the name
    fn finish_function_pointer(&mut self, var_type: LocatedType) -> LocatedType {
        if !self.check(TokenKind::LeftParen) || !matches!(var_type.node, Type::Pointer(_)) {
            return var_type;
        }

        self.advance();
        let param_types = self.parse_type_list(TokenKind::RightParen);
        self.consume(TokenKind::RightParen, "Expected ')' after function pointer parameter types");

        let span = self.span_from(var_type.span.start);
        let Located { node, id, .. } = var_type;
        match node {
            Type::Pointer(PointerType {
                pointee,
                is_const,
                is_volatile,
            }) => {
                let function = self.node_with_span(
                    Type::Function(FunctionType {
                        param_types,
                        return_type: pointee,
                    }),
                    span,
                );
                Located::new(
                    Type::Pointer(PointerType {
                        pointee: Box::new(function),
                        is_const,
                        is_volatile,
                    }),
                    span,
                    id,
                )
            }
            other => Located::new(other, span, id),
        }
    }

    /// Initializer and further declarators after the first name; each
    /// declarator becomes its own variable
    fn finish_variable_declaration(
        &mut self,
        start: SourceLocation,
        qualifiers: Qualifiers,
        var_type: LocatedType,
        name: String,
        instantiation: Option<Instantiation>,
    ) -> NonEmpty<LocatedDecl> {
        let first = self.variable_declarator(start, qualifiers, var_type.clone(), name, instantiation);
        let mut decls = NonEmpty::new(first);

        while self.match_token(TokenKind::Comma) {
            let name = self.consume_identifier("Expected variable name after ','");
            let var_type = self.duplicate_type(&var_type);
            decls.push(self.variable_declarator(start, qualifiers, var_type, name, None));
        }

        self.expect_semicolon("variable declaration");
        decls
    }

    fn variable_declarator(
        &mut self,
        start: SourceLocation,
        qualifiers: Qualifiers,
        var_type: LocatedType,
        name: String,
        instantiation: Option<Instantiation>,
    ) -> LocatedDecl {
        let initializer = if self.match_token(TokenKind::Equal) {
            Some(self.parse_expression())
        } else {
            None
        };

        self.node(
            Declaration::Variable(VariableDecl {
                var_type,
                name,
                initializer,
                is_const: qualifiers.is_const,
                is_volatile: qualifiers.is_volatile,
                instantiation,
            }),
            start,
        )
    }

    /// Copy of a type shared by several declarators, with fresh node ids
    fn duplicate_type(&mut self, ty: &LocatedType) -> LocatedType {
        let mut copy = ty.clone();
        Restamp {
            next_id: self.id_counter(),
        }
        .visit_type_mut(&mut copy);
        copy
    }
}
