//! Declaration grammar and identifier-led declaration disambiguation

mod common;

use common::{error_kinds, parse, parse_body, parse_clean, single_declaration};
use flux_syntax::ast::query::AstQuery;
use flux_syntax::{BuiltinType, Declaration, ErrorKind, Expr, Stmt, Type, VariableDecl};

fn variable(decl: &Declaration) -> &VariableDecl {
    match decl {
        Declaration::Variable(var) => var,
        other => panic!("expected a variable declaration, got {:?}", other),
    }
}

fn local_variable(stmt: &Stmt) -> &VariableDecl {
    match stmt {
        Stmt::VarDecl(var) => var,
        other => panic!("expected a local variable, got {:?}", other),
    }
}

#[test]
fn test_plain_declaration() {
    let decl = single_declaration("Foo x;");
    let var = variable(&decl.node);
    assert_eq!(var.name, "x");
    assert_eq!(var.var_type.node, Type::Named("Foo".to_string()));
    assert!(var.initializer.is_none());
    assert!(var.instantiation.is_none());
}

#[test]
fn test_pointer_declaration() {
    let decl = single_declaration("Foo* x = @y;");
    let var = variable(&decl.node);
    let Type::Pointer(pointer) = &var.var_type.node else {
        panic!("expected a pointer type");
    };
    assert_eq!(pointer.pointee.node, Type::Named("Foo".to_string()));
    assert!(matches!(var.initializer.as_ref().map(|init| &init.node), Some(Expr::Unary(_))));
}

#[test]
fn test_brace_instantiation() {
    let decl = single_declaration("Foo{} x;");
    let var = variable(&decl.node);
    assert_eq!(var.name, "x");
    assert_eq!(var.instantiation.as_ref().map(|inst| inst.args.len()), Some(0));

    let decl = single_declaration("Foo(1, 2){} x;");
    let var = variable(&decl.node);
    assert_eq!(var.instantiation.as_ref().map(|inst| inst.args.len()), Some(2));
}

#[test]
fn test_array_declaration() {
    let decl = single_declaration("int[4] values;");
    let var = variable(&decl.node);
    let Type::Array(array) = &var.var_type.node else {
        panic!("expected an array type");
    };
    assert_eq!(array.element.node, Type::Named("int".to_string()));
    assert!(array.size.is_some());
}

#[test]
fn test_function_pointer_declaration() {
    let decl = single_declaration("int* fp(int, int) = @add;");
    let var = variable(&decl.node);
    let function = var
        .var_type
        .node
        .as_function_pointer()
        .expect("function pointer type");
    assert_eq!(var.name, "fp");
    assert_eq!(function.param_types.len(), 2);
    assert_eq!(function.return_type.node, Type::Named("int".to_string()));
    assert!(var.initializer.is_some());

    let statements = parse_body("int* handler(int) = @on_event;");
    let local = local_variable(&statements[0].node);
    assert_eq!(local.name, "handler");
    assert!(local.var_type.node.as_function_pointer().is_some());
}

#[test]
fn test_not_a_declaration_falls_back_to_statement() {
    let statements = parse_body("foo(1, 2);\nx = y;\na[0] = 1;\nb < c;");
    assert_eq!(statements.len(), 4);
    for stmt in &statements {
        assert!(matches!(stmt.node, Stmt::Expression(_)), "got {:?}", stmt.node);
    }
}

#[test]
fn test_product_statement_reads_as_pointer_declaration() {
    let statements = parse_body("a * b;");
    let var = local_variable(&statements[0].node);
    assert_eq!(var.name, "b");
    assert!(matches!(var.var_type.node, Type::Pointer(_)));
}

#[test]
fn test_rejected_lookahead_leaves_no_diagnostics() {
    // `x < y` first reads as an unterminated template type
    let statements = parse_body("x < y;\nList<List<int>> nested;");
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0].node, Stmt::Expression(_)));
    let var = local_variable(&statements[1].node);
    assert!(matches!(var.var_type.node, Type::TemplateInstantiation(_)));
}

#[test]
fn test_multiple_declarators_share_the_type() {
    let program = parse_clean("const int a = 1, b, c = 3;");
    assert_eq!(program.declarations.len(), 3);

    let names: Vec<&str> = program
        .declarations
        .iter()
        .map(|decl| variable(&decl.node).name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let first = variable(&program.declarations[0].node);
    let second = variable(&program.declarations[1].node);
    assert!(second.is_const);
    assert_eq!(first.var_type.node, second.var_type.node);
    assert_ne!(first.var_type.id, second.var_type.id);
    assert!(second.initializer.is_none());
    assert!(variable(&program.declarations[2].node).initializer.is_some());
}

#[test]
fn test_keyword_led_variables() {
    let program = parse_clean(
        "volatile auto counter = 0;\nvoid* raw;\nunsigned data{16} port;\nobject* handle;\ndef(int) -> int callback;",
    );
    assert_eq!(program.declarations.len(), 5);
    assert!(variable(&program.declarations[0].node).is_volatile);
    assert_eq!(
        variable(&program.declarations[0].node).var_type.node,
        Type::Builtin(BuiltinType::Auto)
    );
    assert!(matches!(
        variable(&program.declarations[2].node).var_type.node,
        Type::Data(_)
    ));
    assert!(matches!(
        variable(&program.declarations[4].node).var_type.node,
        Type::Function(_)
    ));
}

#[test]
fn test_forward_declarations() {
    let program = parse_clean("object Foo;\nclass Bar;\nstruct Baz;\nobject Foo { };");
    let forward: Vec<bool> = program
        .declarations
        .iter()
        .map(|decl| match &decl.node {
            Declaration::Object(object) => object.is_forward,
            Declaration::Class(class) => class.is_forward,
            Declaration::Struct(decl) => decl.is_forward,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(forward, vec![true, true, true, false]);
}

#[test]
fn test_class_with_bases_and_exclusions() {
    let decl = single_declaration("class Shape : Base, geo.Drawable, !Hidden {\n    int sides;\n}");
    let Declaration::Class(class) = &decl.node else {
        panic!("expected a class");
    };
    let bases: Vec<String> = class.base_list.iter().map(ToString::to_string).collect();
    assert_eq!(bases, vec!["Base", "geo.Drawable"]);
    assert_eq!(class.exclusion_list.len(), 1);
    assert_eq!(class.members.len(), 1);
}

#[test]
fn test_object_exclusion_is_reported() {
    let output = parse("object Widget : Base, !Hidden { }");
    assert_eq!(error_kinds(&output), vec![ErrorKind::InvalidExclusion]);
    assert!(matches!(output.program.declarations[0].node, Declaration::Object(_)));
}

#[test]
fn test_function_in_class_is_reported_but_kept() {
    let output = parse("class Shape {\n    def area() -> int { return 0; }\n}");
    assert_eq!(error_kinds(&output), vec![ErrorKind::FunctionInClass]);
    let Declaration::Class(class) = &output.program.declarations[0].node else {
        panic!("expected a class");
    };
    assert!(matches!(class.members[0].node, Declaration::Function(_)));

    let program = parse_clean("object Shape {\n    def area() -> int { return 0; }\n}");
    assert_eq!(AstQuery::declared_names(&program), vec!["Shape", "area"]);
}

#[test]
fn test_functions_and_prototypes() {
    let program = parse_clean("def add(int a, int b) -> int { return a + b; }\ndef log(string message);\ndef main() { }");
    let functions: Vec<_> = program
        .declarations
        .iter()
        .map(|decl| match &decl.node {
            Declaration::Function(function) => function,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(functions[0].params.len(), 2);
    assert!(!functions[0].is_prototype);
    assert!(functions[1].is_prototype);
    assert!(functions[1].body.is_none());
    // A missing return type means void
    assert_eq!(
        functions[2].return_type.node,
        Type::Builtin(BuiltinType::Void)
    );
}

#[test]
fn test_operator_overload() {
    let decl = single_declaration("operator(Vec a, Vec b)[+] -> Vec { return a; }");
    let Declaration::Operator(operator) = &decl.node else {
        panic!("expected an operator");
    };
    assert_eq!(operator.symbol, "+");
    assert_eq!(operator.params.len(), 2);
}

#[test]
fn test_namespace_import_using() {
    let program = parse_clean(
        "import \"std/io.fx\" as io;\nusing std.io;\nnamespace math {\n    def sq(int x) -> int { return x * x; }\n    namespace inner { int depth; }\n}",
    );
    let Declaration::Import(import) = &program.declarations[0].node else {
        panic!("expected an import");
    };
    assert_eq!(import.path, "std/io.fx");
    assert_eq!(import.alias.as_deref(), Some("io"));
    assert!(matches!(program.declarations[1].node, Declaration::Using(_)));
    assert_eq!(
        AstQuery::declared_names(&program),
        vec!["io", "math", "sq", "inner", "depth"]
    );
}

#[test]
fn test_namespace_without_body_is_reported() {
    let output = parse("namespace empty;\nint x;");
    assert_eq!(error_kinds(&output), vec![ErrorKind::ExpectedToken]);
    assert_eq!(output.program.declarations.len(), 2);
}

#[test]
fn test_template_enum_alias_and_data() {
    let program = parse_clean(
        "template <T, U> def pair(T a, U b) -> T { return a; }\nenum Color { Red, Green = 2, Blue };\ntype Size = unsigned data{64};\nsigned data{32} as i32;\ndata{8} as byte;",
    );
    let Declaration::Template(template) = &program.declarations[0].node else {
        panic!("expected a template");
    };
    assert_eq!(template.type_params, vec!["T", "U"]);
    assert!(matches!(template.inner.node, Declaration::Function(_)));

    let Declaration::Enum(color) = &program.declarations[1].node else {
        panic!("expected an enum");
    };
    assert_eq!(color.members.len(), 3);
    assert!(color.members[1].value.is_some());

    assert!(matches!(program.declarations[2].node, Declaration::TypeAlias(_)));

    let Declaration::Data(signed) = &program.declarations[3].node else {
        panic!("expected a data declaration");
    };
    assert_eq!((signed.bit_width, signed.is_signed), (32, true));
    let Declaration::Data(byte) = &program.declarations[4].node else {
        panic!("expected a data declaration");
    };
    assert_eq!((byte.bit_width, byte.is_signed), (8, false));
}

#[test]
fn test_struct_fields() {
    let decl = single_declaration("struct Pixel { data{8} r; data{8} g, b; };");
    let Declaration::Struct(pixel) = &decl.node else {
        panic!("expected a struct");
    };
    let names: Vec<&str> = pixel.fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["r", "g", "b"]);
    assert_ne!(pixel.fields[1].field_type.id, pixel.fields[2].field_type.id);
}

#[test]
fn test_asm_declaration() {
    let decl = single_declaration("asm { mov eax, 1 }");
    assert_eq!(decl.node, Declaration::Asm("mov eax, 1".to_string()));
}

#[test]
fn test_misplaced_declaration_in_function_stays_in_tree() {
    let output = parse("def main() -> void {\n    struct Inner { int x; }\n    int y = 1;\n}");
    assert_eq!(error_kinds(&output), vec![ErrorKind::MisplacedDeclaration]);
    common::assert_well_formed(&output.program);

    let body = common::function_body(&output.program, "main");
    assert_eq!(body.statements.len(), 2);
    let Stmt::Misplaced(inner) = &body.statements[0].node else {
        panic!("expected the struct to be kept, got {:?}", body.statements[0].node);
    };
    assert!(matches!(&inner.node, Declaration::Struct(decl) if decl.name == "Inner"));
    assert_eq!(inner.span, body.statements[0].span);
    assert!(matches!(body.statements[1].node, Stmt::VarDecl(_)));

    // The struct's field type is still reachable by traversal
    let without = parse("def main() -> void {\n    int y = 1;\n}");
    assert_eq!(
        AstQuery::count_nodes(&output.program),
        AstQuery::count_nodes(&without.program) + 3
    );
}
