use crate::Parse;
use indoc::indoc;

#[test]
fn simple_procedure() {
    let input = "PROCEDURE P IS BEGIN NULL; END;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ProcedureDecl
        name: Identifier "P"
        body: NullStmt
    "#);
}

#[test]
fn function_with_parameters_and_locals() {
    let input = indoc! {r#"
    FUNCTION Get_Name (id_ IN VARCHAR2, n_ NUMBER DEFAULT 0) RETURN VARCHAR2 IS
       result_ VARCHAR2(100);
    BEGIN
       RETURN result_;
    END Get_Name;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      FunctionDecl
        name: Identifier "Get_Name"
        parameters: ParameterDecl
          name: Identifier "id_"
          direction: Modifier "IN"
          type: TypeSpec
            name: Identifier "VARCHAR2"
        parameters: ParameterDecl
          name: Identifier "n_"
          type: TypeSpec
            name: Identifier "NUMBER"
          default_value: Literal "0"
        return_type: TypeSpec
          name: Identifier "VARCHAR2"
        declarations: VariableDecl
          name: Identifier "result_"
          type: TypeSpec
            name: Identifier "VARCHAR2"
            arguments: Literal "100"
        body: ReturnStmt
          value: Identifier "result_"
        end_name: Identifier "Get_Name"
    "#);
}

#[test]
fn function_trailers() {
    let input = "FUNCTION F RETURN NUMBER DETERMINISTIC IS BEGIN RETURN 1; END;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      FunctionDecl
        name: Identifier "F"
        return_type: TypeSpec
          name: Identifier "NUMBER"
        modifiers: Modifier "DETERMINISTIC"
        body: ReturnStmt
          value: Literal "1"
    "#);
}

#[test]
fn package_spec_declarations() {
    let input = indoc! {r#"
    PACKAGE Demo_API IS
       lu_name_ CONSTANT VARCHAR2(25) := 'Demo';
       no_rows EXCEPTION;
       TYPE Rec IS RECORD (id NUMBER, name VARCHAR2(10) NOT NULL);
       TYPE Id_Tab IS TABLE OF NUMBER INDEX BY BINARY_INTEGER;
       TYPE Cur IS REF CURSOR;
       SUBTYPE Flag IS VARCHAR2(1);
       CURSOR get_all (id_ NUMBER) IS SELECT * FROM demo_tab WHERE id = id_;
       PRAGMA EXCEPTION_INIT(no_rows, -20001);
    END Demo_API;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      PackageDecl
        name: Identifier "Demo_API"
        declarations: ConstantDecl
          name: Identifier "lu_name_"
          type: TypeSpec
            name: Identifier "VARCHAR2"
            arguments: Literal "25"
          default_value: Literal "'Demo'"
        declarations: ExceptionDecl
          name: Identifier "no_rows"
        declarations: RecordTypeDecl
          name: Identifier "Rec"
          fields: RecordField
            name: Identifier "id"
            type: TypeSpec
              name: Identifier "NUMBER"
          fields: RecordField
            name: Identifier "name"
            type: TypeSpec
              name: Identifier "VARCHAR2"
              arguments: Literal "10"
            constraint: Modifier "NOT NULL"
        declarations: TableTypeDecl
          name: Identifier "Id_Tab"
          element_type: TypeSpec
            name: Identifier "NUMBER"
          index_type: TypeSpec
            name: Identifier "BINARY_INTEGER"
        declarations: RefCursorTypeDecl
          name: Identifier "Cur"
        declarations: SubtypeDecl
          name: Identifier "Flag"
          type: TypeSpec
            name: Identifier "VARCHAR2"
            arguments: Literal "1"
        declarations: CursorDecl
          name: Identifier "get_all"
          parameters: ParameterDecl
            name: Identifier "id_"
            type: TypeSpec
              name: Identifier "NUMBER"
          query: SelectStmt
            select_list: Wildcard "*"
            from: TableRef
              table: Identifier "demo_tab"
            where: BinaryExpr
              left: Identifier "id"
              operator: Operator "="
              right: Identifier "id_"
        declarations: PragmaDirective
          name: Identifier "EXCEPTION_INIT"
          arguments: Identifier "no_rows"
          arguments: UnaryExpr
            operator: Operator "-"
            operand: Literal "20001"
        end_name: Identifier "Demo_API"
    "#);
}

#[test]
fn create_or_replace_package_body() {
    let input = indoc! {r#"
    CREATE OR REPLACE PACKAGE BODY Demo_API IS
    BEGIN
       Init;
    END Demo_API;
    /
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      PackageBody
        modifiers: Modifier "CREATE OR REPLACE"
        name: Identifier "Demo_API"
        body: CallStmt
          call: Identifier "Init"
        end_name: Identifier "Demo_API"
    "#);
}

#[test]
fn anonymous_block_with_declare() {
    let input = indoc! {r#"
    DECLARE
       x NUMBER;
    BEGIN
       x := 1;
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AnonymousBlock
        declarations: VariableDecl
          name: Identifier "x"
          type: TypeSpec
            name: Identifier "NUMBER"
        body: AssignmentStmt
          target: Identifier "x"
          value: Literal "1"
    "#);
}

#[test]
fn layer_directive_before_units() {
    let input = indoc! {r#"
    layer Core;
    PROCEDURE P IS BEGIN NULL; END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      LayerDirective
        name: Identifier "Core"
      ProcedureDecl
        name: Identifier "P"
        body: NullStmt
    "#);
}

#[test]
fn type_specs() {
    let input = indoc! {r#"
    v1 tab.col%TYPE;
    v2 TIMESTAMP WITH TIME ZONE;
    v3 NUMBER(10, 2);
    v4 VARCHAR2(100 CHAR);
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      VariableDecl
        name: Identifier "v1"
        type: TypeSpec
          name: QualifiedIdentifier "tab.col"
          attribute: Identifier "TYPE"
      VariableDecl
        name: Identifier "v2"
        type: TypeSpec
          name: Identifier "TIMESTAMP"
          modifiers: Modifier "WITH TIME ZONE"
      VariableDecl
        name: Identifier "v3"
        type: TypeSpec
          name: Identifier "NUMBER"
          arguments: Literal "10"
          arguments: Literal "2"
      VariableDecl
        name: Identifier "v4"
        type: TypeSpec
          name: Identifier "VARCHAR2"
          arguments: Literal "100"
          modifiers: Modifier "CHAR"
    "#);
}

#[test]
fn nested_subprogram_in_declare_section() {
    let input = indoc! {r#"
    PROCEDURE Parent IS
       PROCEDURE Child IS
       BEGIN
          NULL;
       END Child;
    BEGIN
       Child;
    END Parent;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ProcedureDecl
        name: Identifier "Parent"
        declarations: ProcedureDecl
          name: Identifier "Child"
          body: NullStmt
          end_name: Identifier "Child"
        body: CallStmt
          call: Identifier "Child"
        end_name: Identifier "Parent"
    "#);
}

#[test]
fn annotated_declarations() {
    let input = indoc! {r#"
    @Override
    PROCEDURE Check___ IS
    BEGIN
       super();
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ProcedureDecl
        annotations: Annotation "@Override"
        name: Identifier "Check___"
        body: CallStmt
          call: FunctionCall
            function: Identifier "super"
    "#);
}
