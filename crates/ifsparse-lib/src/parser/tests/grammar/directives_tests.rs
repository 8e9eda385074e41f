use crate::Parse;
use crate::parser::Field;
use indoc::indoc;

#[test]
fn conditional_compilation_with_statements() {
    let input = indoc! {r#"
    $IF Component_Order_SYS.INSTALLED $THEN
       x := 1;
    $ELSE
       x := 2;
    $END
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ConditionalCompilation
        condition: MemberAccess
          object: Identifier "Component_Order_SYS"
          member: Identifier "INSTALLED"
        then_body: AssignmentStmt
          target: Identifier "x"
          value: Literal "1"
        else_clause: ElseClause
          body: AssignmentStmt
            target: Identifier "x"
            value: Literal "2"
    "#);
}

#[test]
fn conditional_compilation_with_declarations() {
    let input = indoc! {r#"
    PACKAGE BODY Demo_API IS
    $IF $$debug $THEN
       PROCEDURE Trace (msg_ VARCHAR2) IS BEGIN NULL; END;
    $ELSIF Component_Order_SYS.INSTALLED $THEN
       flag_ BOOLEAN := TRUE;
    $END
    END Demo_API;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      PackageBody
        name: Identifier "Demo_API"
        declarations: ConditionalCompilation
          condition: InquiryDirective "$$debug"
          then_body: ProcedureDecl
            name: Identifier "Trace"
            parameters: ParameterDecl
              name: Identifier "msg_"
              type: TypeSpec
                name: Identifier "VARCHAR2"
            body: NullStmt
          elsif_clauses: ElsifClause
            condition: MemberAccess
              object: Identifier "Component_Order_SYS"
              member: Identifier "INSTALLED"
            then_body: VariableDecl
              name: Identifier "flag_"
              type: TypeSpec
                name: Identifier "BOOLEAN"
              default_value: Literal "TRUE"
        end_name: Identifier "Demo_API"
    "#);
}

#[test]
fn error_directive_inside_condition() {
    let input = indoc! {r#"
    $IF $$version < 10 $THEN
       $ERROR 'unsupported' $END
    $END
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ConditionalCompilation
        condition: BinaryExpr
          left: InquiryDirective "$$version"
          operator: Operator "<"
          right: Literal "10"
        then_body: ErrorDirective
          message: Literal "'unsupported'"
    "#);
}

#[test]
fn search_and_replace_template() {
    let input = indoc! {r#"
    PROCEDURE P IS
    BEGIN
       $SEARCH
       x := 1;
       $REPLACE
       x := 2;
       $END
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ProcedureDecl
        name: Identifier "P"
        body: TemplateDirective
          sections: TemplateSection
            text: TemplateText "x := 1;"
          sections: TemplateSection
            text: TemplateText "x := 2;"
    "#);
}

#[test]
fn template_text_keeps_nested_directives() {
    let input = indoc! {r#"
    $TEXTAPPEND
    $IF $$a $THEN b; $END
    $END
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      TemplateDirective
        sections: TemplateSection
          text: TemplateText "$IF $$a $THEN b; $END"
    "#);
}

#[test]
fn annotations_attach_to_following_item() {
    let input = indoc! {r#"
    @Overtake
    @UncheckedAccess
    FUNCTION Get RETURN NUMBER IS BEGIN RETURN 1; END;
    "#};

    let parse = Parse::expect_valid(input);
    let function = parse.tree().root().child_nodes().next().unwrap();
    let names: Vec<_> = function
        .field(Field::Annotations)
        .map(|n| n.text())
        .collect();

    assert_eq!(names, ["@Overtake", "@UncheckedAccess"]);
}
