use crate::Parse;

#[test]
fn arithmetic_precedence() {
    let input = "x := a + b * c - d;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BinaryExpr
            left: Identifier "a"
            operator: Operator "+"
            right: BinaryExpr
              left: Identifier "b"
              operator: Operator "*"
              right: Identifier "c"
          operator: Operator "-"
          right: Identifier "d"
    "#);
}

#[test]
fn logical_operators() {
    let input = "x := a = 1 AND NOT b OR c IS NOT NULL;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BinaryExpr
            left: BinaryExpr
              left: Identifier "a"
              operator: Operator "="
              right: Literal "1"
            operator: Operator "AND"
            right: UnaryExpr
              operator: Operator "NOT"
              operand: Identifier "b"
          operator: Operator "OR"
          right: IsNullExpr
            operand: Identifier "c"
            operator: Operator "IS NOT NULL"
    "#);
}

#[test]
fn between_and_not_in() {
    let input = "x := a BETWEEN 1 AND 10 AND b NOT IN (1, 2);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BetweenExpr
            operand: Identifier "a"
            operator: Operator "BETWEEN"
            low: Literal "1"
            high: Literal "10"
          operator: Operator "AND"
          right: InExpr
            operand: Identifier "b"
            operator: Operator "NOT IN"
            list: ExpressionList
              items: Literal "1"
              items: Literal "2"
    "#);
}

#[test]
fn like_with_escape() {
    let input = "x := c LIKE 'A%' ESCAPE '!';";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: LikeExpr
          operand: Identifier "c"
          operator: Operator "LIKE"
          right: Literal "'A%'"
          escape: Literal "'!'"
    "#);
}

#[test]
fn member_access_and_calls() {
    let input = "x := Customer_API.Get_Name(id_ => 1).first_name;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: MemberAccess
          object: FunctionCall
            function: MemberAccess
              object: Identifier "Customer_API"
              member: Identifier "Get_Name"
            arguments: NamedArgument
              name: Identifier "id_"
              value: Literal "1"
          member: Identifier "first_name"
    "#);
}

#[test]
fn cursor_attributes_and_bind_variables() {
    let input = "IF c%NOTFOUND OR SQL%ROWCOUNT = 0 THEN x := :bind; END IF;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      IfStmt
        condition: BinaryExpr
          left: CursorAttribute
            cursor: Identifier "c"
            attribute: Identifier "NOTFOUND"
          operator: Operator "OR"
          right: BinaryExpr
            left: CursorAttribute
              cursor: Identifier "SQL"
              attribute: Identifier "ROWCOUNT"
            operator: Operator "="
            right: Literal "0"
        then_body: AssignmentStmt
          target: Identifier "x"
          value: BindVariable ":bind"
    "#);
}

#[test]
fn searched_case_expression() {
    let input = "x := CASE WHEN a > 1 THEN 'big' ELSE 'small' END CASE;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: CaseExpr
          when_clauses: CaseWhenClause
            condition: BinaryExpr
              left: Identifier "a"
              operator: Operator ">"
              right: Literal "1"
            value: Literal "'big'"
          else_clause: ElseClause
            value: Literal "'small'"
    "#);
}

#[test]
fn simple_case_expression() {
    let input = "x := CASE k WHEN 1 THEN 'A' END CASE;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: CaseExpr
          selector: Identifier "k"
          when_clauses: CaseWhenClause
            condition: Literal "1"
            value: Literal "'A'"
    "#);
}

#[test]
fn special_function_forms() {
    let input = "x := COUNT(*) + EXTRACT(YEAR FROM d) + CAST(y AS NUMBER);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BinaryExpr
            left: FunctionCall
              function: Identifier "COUNT"
              arguments: Wildcard "*"
            operator: Operator "+"
            right: ExtractExpr
              part: Identifier "YEAR"
              value: Identifier "d"
          operator: Operator "+"
          right: CastExpr
            value: Identifier "y"
            type: TypeSpec
              name: Identifier "NUMBER"
    "#);
}

#[test]
fn window_function() {
    let input = "x := ROW_NUMBER() OVER (PARTITION BY a ORDER BY b DESC);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: FunctionCall
          function: Identifier "ROW_NUMBER"
          over: OverClause
            partition_by: Identifier "a"
            order_by: OrderByClause
              items: OrderByItem
                value: Identifier "b"
                direction: Modifier "DESC"
    "#);
}

#[test]
fn typed_literals_and_concatenation() {
    let input = "x := DATE '2024-01-01' || 'a' || -1.5;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BinaryExpr
            left: Literal "DATE '2024-01-01'"
            operator: Operator "||"
            right: Literal "'a'"
          operator: Operator "||"
          right: UnaryExpr
            operator: Operator "-"
            operand: Literal "1.5"
    "#);
}

#[test]
fn exists_subquery() {
    let input = "IF EXISTS (SELECT 1 FROM dual) THEN NULL; END IF;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      IfStmt
        condition: ExistsExpr
          query: Subquery
            query: SelectStmt
              select_list: SelectItem
                value: Literal "1"
              from: TableRef
                table: Identifier "dual"
        then_body: NullStmt
    "#);
}

#[test]
fn parentheses_and_tuples() {
    let input = "x := (a + 1) * 2 + (SELECT MAX(n) FROM t);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: BinaryExpr
            left: ParenthesizedExpr
              value: BinaryExpr
                left: Identifier "a"
                operator: Operator "+"
                right: Literal "1"
            operator: Operator "*"
            right: Literal "2"
          operator: Operator "+"
          right: Subquery
            query: SelectStmt
              select_list: SelectItem
                value: FunctionCall
                  function: Identifier "MAX"
                  arguments: Identifier "n"
              from: TableRef
                table: Identifier "t"
    "#);
}

#[test]
fn prior_and_outer_join_markers() {
    let input = "x := PRIOR id + b(+);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: Identifier "x"
        value: BinaryExpr
          left: PriorExpr
            operand: Identifier "id"
          operator: Operator "+"
          right: UnaryExpr
            operand: Identifier "b"
            operator: Operator "(+)"
    "#);
}
