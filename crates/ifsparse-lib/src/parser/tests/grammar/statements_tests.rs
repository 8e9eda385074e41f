use crate::Parse;
use indoc::indoc;

#[test]
fn if_elsif_else() {
    let input = indoc! {r#"
    IF a > 0 THEN
       x := 1;
    ELSIF a < 0 THEN
       x := -1;
    ELSE
       NULL;
    END IF;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      IfStmt
        condition: BinaryExpr
          left: Identifier "a"
          operator: Operator ">"
          right: Literal "0"
        then_body: AssignmentStmt
          target: Identifier "x"
          value: Literal "1"
        elsif_clauses: ElsifClause
          condition: BinaryExpr
            left: Identifier "a"
            operator: Operator "<"
            right: Literal "0"
          then_body: AssignmentStmt
            target: Identifier "x"
            value: UnaryExpr
              operator: Operator "-"
              operand: Literal "1"
        else_clause: ElseClause
          body: NullStmt
    "#);
}

#[test]
fn labeled_for_loop_with_exit() {
    let input = indoc! {r#"
    <<outer_loop>>
    FOR i IN REVERSE 1..10 LOOP
       EXIT outer_loop WHEN i = 5;
    END LOOP outer_loop;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ForLoopStmt
        label: LabelStmt
          name: Identifier "outer_loop"
        loop_variable: Identifier "i"
        direction: Modifier "REVERSE"
        low: Literal "1"
        high: Literal "10"
        body: ExitStmt
          label: Identifier "outer_loop"
          condition: BinaryExpr
            left: Identifier "i"
            operator: Operator "="
            right: Literal "5"
        end_name: Identifier "outer_loop"
    "#);
}

#[test]
fn while_and_cursor_loops() {
    let input = indoc! {r#"
    WHILE x < 10 LOOP
       x := x + 1;
    END LOOP;
    FOR r IN get_rows(1) LOOP
       NULL;
    END LOOP;
    FOR r IN (SELECT a FROM t) LOOP
       NULL;
    END LOOP;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      WhileLoopStmt
        condition: BinaryExpr
          left: Identifier "x"
          operator: Operator "<"
          right: Literal "10"
        body: AssignmentStmt
          target: Identifier "x"
          value: BinaryExpr
            left: Identifier "x"
            operator: Operator "+"
            right: Literal "1"
      ForLoopStmt
        loop_variable: Identifier "r"
        cursor: FunctionCall
          function: Identifier "get_rows"
          arguments: Literal "1"
        body: NullStmt
      ForLoopStmt
        loop_variable: Identifier "r"
        query: Subquery
          query: SelectStmt
            select_list: SelectItem
              value: Identifier "a"
            from: TableRef
              table: Identifier "t"
        body: NullStmt
    "#);
}

#[test]
fn plain_loop_and_continue() {
    let input = indoc! {r#"
    LOOP
       CONTINUE WHEN done_;
       EXIT;
    END LOOP;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      LoopStmt
        body: ContinueStmt
          condition: Identifier "done_"
        body: ExitStmt
    "#);
}

#[test]
fn block_with_named_arguments_and_handler() {
    let input = indoc! {r#"
    BEGIN
       Do_Work(a => 1, b);
    EXCEPTION
       WHEN OTHERS THEN
          RAISE;
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AnonymousBlock
        body: CallStmt
          call: FunctionCall
            function: Identifier "Do_Work"
            arguments: NamedArgument
              name: Identifier "a"
              value: Literal "1"
            arguments: Identifier "b"
        exception_handler: ExceptionHandler
          exceptions: Identifier "OTHERS"
          body: RaiseStmt
    "#);
}

#[test]
fn case_statement_closes_with_end() {
    let input = indoc! {r#"
    CASE kind_
       WHEN 'A' THEN
          x := 1;
       ELSE
          x := 2;
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      CaseStmt
        selector: Identifier "kind_"
        when_clauses: CaseWhenClause
          condition: Literal "'A'"
          body: AssignmentStmt
            target: Identifier "x"
            value: Literal "1"
        else_clause: ElseClause
          body: AssignmentStmt
            target: Identifier "x"
            value: Literal "2"
    "#);
}

#[test]
fn raise_return_and_goto() {
    let input = indoc! {r#"
    BEGIN
       RAISE Error_SYS.no_data;
       GOTO done;
       <<done>>
       RETURN;
    END;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AnonymousBlock
        body: RaiseStmt
          name: QualifiedIdentifier "Error_SYS.no_data"
        body: GotoStmt
          label: Identifier "done"
        body: LabelStmt
          name: Identifier "done"
        body: ReturnStmt
    "#);
}

#[test]
fn execute_immediate() {
    let input = "EXECUTE IMMEDIATE stmt_ INTO n_ USING IN id_, OUT res_;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ExecuteImmediateStmt
        value: Identifier "stmt_"
        into: Identifier "n_"
        using: UsingArgument
          direction: Modifier "IN"
          value: Identifier "id_"
        using: UsingArgument
          direction: Modifier "OUT"
          value: Identifier "res_"
    "#);
}

#[test]
fn cursor_statements() {
    let input = indoc! {r#"
    OPEN c FOR SELECT a FROM t;
    FETCH c BULK COLLECT INTO rows_ LIMIT 100;
    CLOSE c;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      OpenCursorStmt
        cursor: Identifier "c"
        query: SelectStmt
          select_list: SelectItem
            value: Identifier "a"
          from: TableRef
            table: Identifier "t"
      FetchStmt
        cursor: Identifier "c"
        bulk_collect: Modifier "BULK COLLECT"
        into: Identifier "rows_"
        limit: Literal "100"
      CloseStmt
        cursor: Identifier "c"
    "#);
}

#[test]
fn forall_with_dml() {
    let input = "FORALL i IN 1..ids_.COUNT DELETE FROM t WHERE id = ids_(i);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ForallStmt
        loop_variable: Identifier "i"
        low: Literal "1"
        high: MemberAccess
          object: Identifier "ids_"
          member: Identifier "COUNT"
        body: DeleteStmt
          table: TableRef
            table: Identifier "t"
          where: BinaryExpr
            left: Identifier "id"
            operator: Operator "="
            right: FunctionCall
              function: Identifier "ids_"
              arguments: Identifier "i"
    "#);
}

#[test]
fn assignment_to_member_and_element() {
    let input = "rec_.name := arr_(2);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      AssignmentStmt
        target: MemberAccess
          object: Identifier "rec_"
          member: Identifier "name"
        value: FunctionCall
          function: Identifier "arr_"
          arguments: Literal "2"
    "#);
}

#[test]
fn annotated_statement() {
    let input = "@ApproveTransactionStatement(2020-01-01,user)\nCOMMIT;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      CommitStmt
        annotations: Annotation "@ApproveTransactionStatement(2020-01-01,user)"
    "#);
}
