//! Pre-order traversal over the syntax tree
//!
//! Implement the `visit_*` methods you care about; the default bodies call
//! the matching `walk_*` function, which visits children left to right. An
//! override that does not call `walk_*` prunes that subtree.

use super::*;

pub trait Visitor {
    fn visit_declaration(&mut self, decl: &LocatedDecl) {
        walk_declaration(self, decl);
    }

    fn visit_statement(&mut self, stmt: &LocatedStmt) {
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &LocatedExpr) {
        walk_expression(self, expr);
    }

    fn visit_type(&mut self, ty: &LocatedType) {
        walk_type(self, ty);
    }
}

pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    for decl in &program.declarations {
        visitor.visit_declaration(decl);
    }
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    for stmt in &block.statements {
        visitor.visit_statement(stmt);
    }
}

fn walk_params<V: Visitor + ?Sized>(visitor: &mut V, params: &[Parameter]) {
    for param in params {
        visitor.visit_type(&param.param_type);
    }
}

fn walk_variable<V: Visitor + ?Sized>(visitor: &mut V, var: &VariableDecl) {
    visitor.visit_type(&var.var_type);
    if let Some(instantiation) = &var.instantiation {
        for arg in &instantiation.args {
            visitor.visit_expression(arg);
        }
    }
    if let Some(init) = &var.initializer {
        visitor.visit_expression(init);
    }
}

pub fn walk_declaration<V: Visitor + ?Sized>(visitor: &mut V, decl: &LocatedDecl) {
    match &decl.node {
        Declaration::Import(_) | Declaration::Using(_) | Declaration::Asm(_) => {}
        Declaration::Data(_) => {}
        Declaration::Namespace(namespace) => {
            for member in &namespace.members {
                visitor.visit_declaration(member);
            }
        }
        Declaration::Class(class) => {
            for member in &class.members {
                visitor.visit_declaration(member);
            }
        }
        Declaration::Object(object) => {
            for member in &object.members {
                visitor.visit_declaration(member);
            }
        }
        Declaration::Struct(decl) => {
            for field in &decl.fields {
                visitor.visit_type(&field.field_type);
            }
        }
        Declaration::Function(function) => {
            walk_params(visitor, &function.params);
            visitor.visit_type(&function.return_type);
            if let Some(body) = &function.body {
                walk_block(visitor, body);
            }
        }
        Declaration::Operator(operator) => {
            walk_params(visitor, &operator.params);
            visitor.visit_type(&operator.return_type);
            walk_block(visitor, &operator.body);
        }
        Declaration::Variable(var) => walk_variable(visitor, var),
        Declaration::Template(template) => visitor.visit_declaration(&template.inner),
        Declaration::Enum(decl) => {
            for member in &decl.members {
                if let Some(value) = &member.value {
                    visitor.visit_expression(value);
                }
            }
        }
        Declaration::TypeAlias(alias) => visitor.visit_type(&alias.underlying),
        Declaration::Statement(stmt) => visitor.visit_statement(stmt),
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, stmt: &LocatedStmt) {
    match &stmt.node {
        Stmt::Expression(expr) | Stmt::Assert(expr) => visitor.visit_expression(expr),
        Stmt::Block(block) => walk_block(visitor, block),
        Stmt::VarDecl(var) => walk_variable(visitor, var),
        Stmt::If(if_stmt) => {
            visitor.visit_expression(&if_stmt.condition);
            visitor.visit_statement(&if_stmt.then_branch);
            if let Some(else_branch) = &if_stmt.else_branch {
                visitor.visit_statement(else_branch);
            }
        }
        Stmt::While(while_stmt) => {
            visitor.visit_expression(&while_stmt.condition);
            visitor.visit_statement(&while_stmt.body);
        }
        Stmt::DoWhile(do_while) => {
            visitor.visit_statement(&do_while.body);
            visitor.visit_expression(&do_while.condition);
        }
        Stmt::For(for_stmt) => {
            for init in &for_stmt.init {
                visitor.visit_statement(init);
            }
            if let Some(condition) = &for_stmt.condition {
                visitor.visit_expression(condition);
            }
            if let Some(increment) = &for_stmt.increment {
                visitor.visit_expression(increment);
            }
            visitor.visit_statement(&for_stmt.body);
        }
        Stmt::ForRange(for_range) => {
            visitor.visit_expression(&for_range.range);
            visitor.visit_statement(&for_range.body);
        }
        Stmt::Switch(switch) => {
            visitor.visit_expression(&switch.subject);
            for case in &switch.cases {
                if let Some(pattern) = &case.pattern {
                    visitor.visit_expression(pattern);
                }
                walk_block(visitor, &case.body);
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expression(value);
            }
        }
        Stmt::Break | Stmt::Continue | Stmt::Asm(_) => {}
        Stmt::Try(try_stmt) => {
            walk_block(visitor, &try_stmt.body);
            for catch in &try_stmt.catches {
                if let Some(exception_type) = &catch.exception_type {
                    visitor.visit_type(exception_type);
                }
                walk_block(visitor, &catch.handler);
            }
        }
        Stmt::Throw(throw) => {
            if let Some(message) = &throw.message {
                visitor.visit_expression(message);
            }
            if let Some(body) = &throw.body {
                walk_block(visitor, body);
            }
        }
        Stmt::Lock(lock) => {
            if let Some(body) = &lock.body {
                walk_block(visitor, body);
            }
        }
        Stmt::Misplaced(decl) => visitor.visit_declaration(decl),
    }
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expr: &LocatedExpr) {
    match &expr.node {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::Placeholder => {}
        Expr::Unary(unary) => visitor.visit_expression(&unary.operand),
        Expr::Binary(binary) => {
            visitor.visit_expression(&binary.left);
            visitor.visit_expression(&binary.right);
        }
        Expr::Assign(assign) => {
            visitor.visit_expression(&assign.target);
            visitor.visit_expression(&assign.value);
        }
        Expr::Ternary(ternary) => {
            visitor.visit_expression(&ternary.condition);
            visitor.visit_expression(&ternary.then_expr);
            visitor.visit_expression(&ternary.else_expr);
        }
        Expr::Call(call) => {
            visitor.visit_expression(&call.callee);
            for arg in &call.args {
                visitor.visit_expression(arg);
            }
        }
        Expr::Member(member) => visitor.visit_expression(&member.object),
        Expr::Subscript(subscript) => {
            visitor.visit_expression(&subscript.object);
            visitor.visit_expression(&subscript.index);
        }
        Expr::Cast(cast) => {
            visitor.visit_type(&cast.target_type);
            visitor.visit_expression(&cast.operand);
        }
        Expr::SizeOf(ty) => visitor.visit_type(ty),
        Expr::TypeOf(inner) | Expr::Group(inner) => visitor.visit_expression(inner),
        Expr::Op(op) => {
            visitor.visit_expression(&op.left);
            visitor.visit_expression(&op.right);
        }
        Expr::InterpolatedString(interpolated) => {
            for part in &interpolated.expr_parts {
                visitor.visit_expression(part);
            }
        }
        Expr::Array(elements) => {
            for element in elements {
                visitor.visit_expression(element);
            }
        }
        Expr::Dictionary(entries) => {
            for entry in entries {
                visitor.visit_expression(&entry.key);
                visitor.visit_expression(&entry.value);
            }
        }
        Expr::AnonymousBlock(statements) => {
            for stmt in statements {
                visitor.visit_statement(stmt);
            }
        }
    }
}

pub fn walk_type<V: Visitor + ?Sized>(visitor: &mut V, ty: &LocatedType) {
    match &ty.node {
        Type::Builtin(_) | Type::Named(_) | Type::Qualified(_) | Type::Data(_) => {}
        Type::Placeholder => {}
        Type::Pointer(pointer) => visitor.visit_type(&pointer.pointee),
        Type::Array(array) => {
            visitor.visit_type(&array.element);
            if let Some(size) = &array.size {
                visitor.visit_expression(size);
            }
        }
        Type::Function(function) => {
            for param in &function.param_types {
                visitor.visit_type(param);
            }
            visitor.visit_type(&function.return_type);
        }
        Type::TemplateInstantiation(instance) => {
            visitor.visit_type(&instance.base);
            for arg in &instance.args {
                visitor.visit_type(arg);
            }
        }
    }
}

/// In-place counterpart of [`Visitor`], for passes that rewrite nodes
pub trait VisitorMut {
    fn visit_declaration_mut(&mut self, decl: &mut LocatedDecl) {
        walk_declaration_mut(self, decl);
    }

    fn visit_statement_mut(&mut self, stmt: &mut LocatedStmt) {
        walk_statement_mut(self, stmt);
    }

    fn visit_expression_mut(&mut self, expr: &mut LocatedExpr) {
        walk_expression_mut(self, expr);
    }

    fn visit_type_mut(&mut self, ty: &mut LocatedType) {
        walk_type_mut(self, ty);
    }
}

pub fn walk_program_mut<V: VisitorMut + ?Sized>(visitor: &mut V, program: &mut Program) {
    for decl in &mut program.declarations {
        visitor.visit_declaration_mut(decl);
    }
}

pub fn walk_block_mut<V: VisitorMut + ?Sized>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        visitor.visit_statement_mut(stmt);
    }
}

fn walk_params_mut<V: VisitorMut + ?Sized>(visitor: &mut V, params: &mut [Parameter]) {
    for param in params {
        visitor.visit_type_mut(&mut param.param_type);
    }
}

fn walk_variable_mut<V: VisitorMut + ?Sized>(visitor: &mut V, var: &mut VariableDecl) {
    visitor.visit_type_mut(&mut var.var_type);
    if let Some(instantiation) = &mut var.instantiation {
        for arg in &mut instantiation.args {
            visitor.visit_expression_mut(arg);
        }
    }
    if let Some(init) = &mut var.initializer {
        visitor.visit_expression_mut(init);
    }
}

pub fn walk_declaration_mut<V: VisitorMut + ?Sized>(visitor: &mut V, decl: &mut LocatedDecl) {
    match &mut decl.node {
        Declaration::Import(_) | Declaration::Using(_) | Declaration::Asm(_) => {}
        Declaration::Data(_) => {}
        Declaration::Namespace(namespace) => {
            for member in &mut namespace.members {
                visitor.visit_declaration_mut(member);
            }
        }
        Declaration::Class(class) => {
            for member in &mut class.members {
                visitor.visit_declaration_mut(member);
            }
        }
        Declaration::Object(object) => {
            for member in &mut object.members {
                visitor.visit_declaration_mut(member);
            }
        }
        Declaration::Struct(decl) => {
            for field in &mut decl.fields {
                visitor.visit_type_mut(&mut field.field_type);
            }
        }
        Declaration::Function(function) => {
            walk_params_mut(visitor, &mut function.params);
            visitor.visit_type_mut(&mut function.return_type);
            if let Some(body) = &mut function.body {
                walk_block_mut(visitor, body);
            }
        }
        Declaration::Operator(operator) => {
            walk_params_mut(visitor, &mut operator.params);
            visitor.visit_type_mut(&mut operator.return_type);
            walk_block_mut(visitor, &mut operator.body);
        }
        Declaration::Variable(var) => walk_variable_mut(visitor, var),
        Declaration::Template(template) => visitor.visit_declaration_mut(&mut template.inner),
        Declaration::Enum(decl) => {
            for member in &mut decl.members {
                if let Some(value) = &mut member.value {
                    visitor.visit_expression_mut(value);
                }
            }
        }
        Declaration::TypeAlias(alias) => visitor.visit_type_mut(&mut alias.underlying),
        Declaration::Statement(stmt) => visitor.visit_statement_mut(stmt),
    }
}

pub fn walk_statement_mut<V: VisitorMut + ?Sized>(visitor: &mut V, stmt: &mut LocatedStmt) {
    match &mut stmt.node {
        Stmt::Expression(expr) | Stmt::Assert(expr) => visitor.visit_expression_mut(expr),
        Stmt::Block(block) => walk_block_mut(visitor, block),
        Stmt::VarDecl(var) => walk_variable_mut(visitor, var),
        Stmt::If(if_stmt) => {
            visitor.visit_expression_mut(&mut if_stmt.condition);
            visitor.visit_statement_mut(&mut if_stmt.then_branch);
            if let Some(else_branch) = &mut if_stmt.else_branch {
                visitor.visit_statement_mut(else_branch);
            }
        }
        Stmt::While(while_stmt) => {
            visitor.visit_expression_mut(&mut while_stmt.condition);
            visitor.visit_statement_mut(&mut while_stmt.body);
        }
        Stmt::DoWhile(do_while) => {
            visitor.visit_statement_mut(&mut do_while.body);
            visitor.visit_expression_mut(&mut do_while.condition);
        }
        Stmt::For(for_stmt) => {
            for init in &mut for_stmt.init {
                visitor.visit_statement_mut(init);
            }
            if let Some(condition) = &mut for_stmt.condition {
                visitor.visit_expression_mut(condition);
            }
            if let Some(increment) = &mut for_stmt.increment {
                visitor.visit_expression_mut(increment);
            }
            visitor.visit_statement_mut(&mut for_stmt.body);
        }
        Stmt::ForRange(for_range) => {
            visitor.visit_expression_mut(&mut for_range.range);
            visitor.visit_statement_mut(&mut for_range.body);
        }
        Stmt::Switch(switch) => {
            visitor.visit_expression_mut(&mut switch.subject);
            for case in &mut switch.cases {
                if let Some(pattern) = &mut case.pattern {
                    visitor.visit_expression_mut(pattern);
                }
                walk_block_mut(visitor, &mut case.body);
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expression_mut(value);
            }
        }
        Stmt::Break | Stmt::Continue | Stmt::Asm(_) => {}
        Stmt::Try(try_stmt) => {
            walk_block_mut(visitor, &mut try_stmt.body);
            for catch in &mut try_stmt.catches {
                if let Some(exception_type) = &mut catch.exception_type {
                    visitor.visit_type_mut(exception_type);
                }
                walk_block_mut(visitor, &mut catch.handler);
            }
        }
        Stmt::Throw(throw) => {
            if let Some(message) = &mut throw.message {
                visitor.visit_expression_mut(message);
            }
            if let Some(body) = &mut throw.body {
                walk_block_mut(visitor, body);
            }
        }
        Stmt::Lock(lock) => {
            if let Some(body) = &mut lock.body {
                walk_block_mut(visitor, body);
            }
        }
        Stmt::Misplaced(decl) => visitor.visit_declaration_mut(decl),
    }
}

pub fn walk_expression_mut<V: VisitorMut + ?Sized>(visitor: &mut V, expr: &mut LocatedExpr) {
    match &mut expr.node {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::Placeholder => {}
        Expr::Unary(unary) => visitor.visit_expression_mut(&mut unary.operand),
        Expr::Binary(binary) => {
            visitor.visit_expression_mut(&mut binary.left);
            visitor.visit_expression_mut(&mut binary.right);
        }
        Expr::Assign(assign) => {
            visitor.visit_expression_mut(&mut assign.target);
            visitor.visit_expression_mut(&mut assign.value);
        }
        Expr::Ternary(ternary) => {
            visitor.visit_expression_mut(&mut ternary.condition);
            visitor.visit_expression_mut(&mut ternary.then_expr);
            visitor.visit_expression_mut(&mut ternary.else_expr);
        }
        Expr::Call(call) => {
            visitor.visit_expression_mut(&mut call.callee);
            for arg in &mut call.args {
                visitor.visit_expression_mut(arg);
            }
        }
        Expr::Member(member) => visitor.visit_expression_mut(&mut member.object),
        Expr::Subscript(subscript) => {
            visitor.visit_expression_mut(&mut subscript.object);
            visitor.visit_expression_mut(&mut subscript.index);
        }
        Expr::Cast(cast) => {
            visitor.visit_type_mut(&mut cast.target_type);
            visitor.visit_expression_mut(&mut cast.operand);
        }
        Expr::SizeOf(ty) => visitor.visit_type_mut(ty),
        Expr::TypeOf(inner) | Expr::Group(inner) => visitor.visit_expression_mut(inner),
        Expr::Op(op) => {
            visitor.visit_expression_mut(&mut op.left);
            visitor.visit_expression_mut(&mut op.right);
        }
        Expr::InterpolatedString(interpolated) => {
            for part in &mut interpolated.expr_parts {
                visitor.visit_expression_mut(part);
            }
        }
        Expr::Array(elements) => {
            for element in elements {
                visitor.visit_expression_mut(element);
            }
        }
        Expr::Dictionary(entries) => {
            for entry in entries {
                visitor.visit_expression_mut(&mut entry.key);
                visitor.visit_expression_mut(&mut entry.value);
            }
        }
        Expr::AnonymousBlock(statements) => {
            for stmt in statements {
                visitor.visit_statement_mut(stmt);
            }
        }
    }
}

pub fn walk_type_mut<V: VisitorMut + ?Sized>(visitor: &mut V, ty: &mut LocatedType) {
    match &mut ty.node {
        Type::Builtin(_) | Type::Named(_) | Type::Qualified(_) | Type::Data(_) => {}
        Type::Placeholder => {}
        Type::Pointer(pointer) => visitor.visit_type_mut(&mut pointer.pointee),
        Type::Array(array) => {
            visitor.visit_type_mut(&mut array.element);
            if let Some(size) = &mut array.size {
                visitor.visit_expression_mut(size);
            }
        }
        Type::Function(function) => {
            for param in &mut function.param_types {
                visitor.visit_type_mut(param);
            }
            visitor.visit_type_mut(&mut function.return_type);
        }
        Type::TemplateInstantiation(instance) => {
            visitor.visit_type_mut(&mut instance.base);
            for arg in &mut instance.args {
                visitor.visit_type_mut(arg);
            }
        }
    }
}
