use crate::Parse;
use indoc::indoc;

#[test]
fn select_into_with_implicit_join() {
    let input = "SELECT a INTO x FROM t1 a1, t2 a2 WHERE a1.id = a2.id(+);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectIntoStmt
        select_list: SelectItem
          value: Identifier "a"
        into: Identifier "x"
        from: ImplicitJoin
          left: TableRef
            table: Identifier "t1"
            alias: Identifier "a1"
          right: TableRef
            table: Identifier "t2"
            alias: Identifier "a2"
        where: BinaryExpr
          left: MemberAccess
            object: Identifier "a1"
            member: Identifier "id"
          operator: Operator "="
          right: UnaryExpr
            operand: MemberAccess
              object: Identifier "a2"
              member: Identifier "id"
            operator: Operator "(+)"
    "#);
}

#[test]
fn implicit_joins_are_left_associative() {
    let input = "SELECT * FROM a, b, c;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: Wildcard "*"
        from: ImplicitJoin
          left: ImplicitJoin
            left: TableRef
              table: Identifier "a"
            right: TableRef
              table: Identifier "b"
          right: TableRef
            table: Identifier "c"
    "#);
}

#[test]
fn explicit_join_binds_before_comma() {
    let input = "SELECT * FROM a JOIN b ON a.id = b.id, c CROSS APPLY d;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: Wildcard "*"
        from: ImplicitJoin
          left: JoinClause
            left: TableRef
              table: Identifier "a"
            right: TableRef
              table: Identifier "b"
            condition: BinaryExpr
              left: MemberAccess
                object: Identifier "a"
                member: Identifier "id"
              operator: Operator "="
              right: MemberAccess
                object: Identifier "b"
                member: Identifier "id"
          right: ApplyClause
            left: TableRef
              table: Identifier "c"
            apply_type: Modifier "CROSS"
            right: TableRef
              table: Identifier "d"
    "#);
}

#[test]
fn join_words_as_names() {
    let input = "SELECT left INTO x FROM t outer WHERE current = 1;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectIntoStmt
        select_list: SelectItem
          value: Identifier "left"
        into: Identifier "x"
        from: TableRef
          table: Identifier "t"
          alias: Identifier "outer"
        where: BinaryExpr
          left: Identifier "current"
          operator: Operator "="
          right: Literal "1"
    "#);
}

#[test]
fn outer_join_with_using() {
    let input = "SELECT * FROM a LEFT OUTER JOIN b USING (id);";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: Wildcard "*"
        from: JoinClause
          left: TableRef
            table: Identifier "a"
          join_type: Modifier "LEFT OUTER"
          right: TableRef
            table: Identifier "b"
          columns: Identifier "id"
    "#);
}

#[test]
fn hierarchical_start_with_first() {
    let input = "SELECT id FROM t START WITH parent IS NULL CONNECT BY PRIOR id = parent;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: SelectItem
          value: Identifier "id"
        from: TableRef
          table: Identifier "t"
        hierarchical: HierarchicalClause
          start_with: IsNullExpr
            operand: Identifier "parent"
            operator: Operator "IS NULL"
          connect_by: BinaryExpr
            left: PriorExpr
              operand: Identifier "id"
            operator: Operator "="
            right: Identifier "parent"
    "#);
}

#[test]
fn hierarchical_connect_by_first() {
    let input = "SELECT id FROM t CONNECT BY NOCYCLE PRIOR id = parent START WITH id = 1;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: SelectItem
          value: Identifier "id"
        from: TableRef
          table: Identifier "t"
        hierarchical: HierarchicalClause
          modifiers: Modifier "NOCYCLE"
          connect_by: BinaryExpr
            left: PriorExpr
              operand: Identifier "id"
            operator: Operator "="
            right: Identifier "parent"
          start_with: BinaryExpr
            left: Identifier "id"
            operator: Operator "="
            right: Literal "1"
    "#);
}

#[test]
fn set_operations() {
    let input = "SELECT a FROM t UNION ALL SELECT b FROM u MINUS SELECT c FROM v;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SetOperation
        left: SetOperation
          left: SelectStmt
            select_list: SelectItem
              value: Identifier "a"
            from: TableRef
              table: Identifier "t"
          operator: Operator "UNION ALL"
          right: SelectStmt
            select_list: SelectItem
              value: Identifier "b"
            from: TableRef
              table: Identifier "u"
        operator: Operator "MINUS"
        right: SelectStmt
          select_list: SelectItem
            value: Identifier "c"
          from: TableRef
            table: Identifier "v"
    "#);
}

#[test]
fn grouping_and_ordering() {
    let input = "SELECT a AS k, COUNT(*) cnt FROM t GROUP BY a HAVING COUNT(*) > 1 ORDER BY cnt DESC NULLS LAST;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        select_list: SelectItem
          value: Identifier "a"
          alias: Identifier "k"
        select_list: SelectItem
          value: FunctionCall
            function: Identifier "COUNT"
            arguments: Wildcard "*"
          alias: Identifier "cnt"
        from: TableRef
          table: Identifier "t"
        group_by: Identifier "a"
        having: BinaryExpr
          left: FunctionCall
            function: Identifier "COUNT"
            arguments: Wildcard "*"
          operator: Operator ">"
          right: Literal "1"
        order_by: OrderByClause
          items: OrderByItem
            value: Identifier "cnt"
            direction: Modifier "DESC"
            nulls: Modifier "NULLS LAST"
    "#);
}

#[test]
fn select_for_update() {
    let input = "SELECT a INTO x FROM t WHERE id = 1 FOR UPDATE NOWAIT;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectIntoStmt
        select_list: SelectItem
          value: Identifier "a"
        into: Identifier "x"
        from: TableRef
          table: Identifier "t"
        where: BinaryExpr
          left: Identifier "id"
          operator: Operator "="
          right: Literal "1"
        for_update: ForUpdateClause
          wait: Modifier "NOWAIT"
    "#);
}

#[test]
fn common_table_expression() {
    let input = "WITH q AS (SELECT a FROM t) SELECT a FROM q;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SelectStmt
        ctes: CommonTableExpr
          name: Identifier "q"
          query: Subquery
            query: SelectStmt
              select_list: SelectItem
                value: Identifier "a"
              from: TableRef
                table: Identifier "t"
        select_list: SelectItem
          value: Identifier "a"
        from: TableRef
          table: Identifier "q"
    "#);
}

#[test]
fn insert_values_returning() {
    let input = "INSERT INTO t (a, b) VALUES (1, 'x') RETURNING id INTO id_;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      InsertStmt
        table: TableRef
          table: Identifier "t"
        columns: Identifier "a"
        columns: Identifier "b"
        values: ExpressionList
          items: Literal "1"
          items: Literal "'x'"
        returning: ReturningClause
          values: Identifier "id"
          into: Identifier "id_"
    "#);
}

#[test]
fn insert_from_query() {
    let input = "INSERT INTO t SELECT * FROM u;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      InsertStmt
        table: TableRef
          table: Identifier "t"
        query: SelectStmt
          select_list: Wildcard "*"
          from: TableRef
            table: Identifier "u"
    "#);
}

#[test]
fn update_where_current_of() {
    let input = "UPDATE t SET a = 1, b = b + 1 WHERE CURRENT OF c;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      UpdateStmt
        table: TableRef
          table: Identifier "t"
        set: SetClause
          target: Identifier "a"
          value: Literal "1"
        set: SetClause
          target: Identifier "b"
          value: BinaryExpr
            left: Identifier "b"
            operator: Operator "+"
            right: Literal "1"
        where: WhereCurrentOf
          cursor: Identifier "c"
    "#);
}

#[test]
fn merge_statement() {
    let input = indoc! {r#"
    MERGE INTO t USING s ON (t.id = s.id)
    WHEN MATCHED THEN UPDATE SET t.a = s.a
    WHEN NOT MATCHED THEN INSERT (id, a) VALUES (s.id, s.a);
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      MergeStmt
        table: TableRef
          table: Identifier "t"
        source: TableRef
          table: Identifier "s"
        condition: ParenthesizedExpr
          value: BinaryExpr
            left: MemberAccess
              object: Identifier "t"
              member: Identifier "id"
            operator: Operator "="
            right: MemberAccess
              object: Identifier "s"
              member: Identifier "id"
        clauses: MergeMatchedClause
          set: SetClause
            target: MemberAccess
              object: Identifier "t"
              member: Identifier "a"
            value: MemberAccess
              object: Identifier "s"
              member: Identifier "a"
        clauses: MergeNotMatchedClause
          columns: Identifier "id"
          columns: Identifier "a"
          values: ExpressionList
            items: MemberAccess
              object: Identifier "s"
              member: Identifier "id"
            items: MemberAccess
              object: Identifier "s"
              member: Identifier "a"
    "#);
}

#[test]
fn transaction_control() {
    let input = indoc! {r#"
    SAVEPOINT sp1;
    ROLLBACK TO SAVEPOINT sp1;
    COMMIT WORK;
    "#};

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      SavepointStmt
        name: Identifier "sp1"
      RollbackStmt
        name: Identifier "sp1"
      CommitStmt
    "#);
}

#[test]
fn statement_node_owns_its_semicolon() {
    let parse = Parse::expect_valid("DELETE FROM t;");
    let statement = parse.tree().root().child_nodes().next().unwrap();

    assert_eq!(statement.text(), "DELETE FROM t;");
}
