#[cfg(test)]
mod tests {
    use siphon::schema::{ColumnDef, TableDef};
    use siphon::sql::CreateTable;

    fn column(name: &str, data_type: &str, unique: bool, nullable: bool) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            data_type: data_type.to_string(),
            unique,
            nullable,
        }
    }

    fn def(columns: Vec<ColumnDef>, unique: Vec<&str>, primary_key: Vec<&str>) -> TableDef {
        TableDef {
            name: "events".to_string(),
            columns,
            unique: unique.into_iter().map(str::to_string).collect(),
            primary_key: primary_key.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_columns_render_in_catalog_order() {
        let def = def(
            vec![
                column("e", "int", false, true),
                column("a", "int", false, true),
                column("c", "int", false, true),
                column("b", "int", false, true),
                column("d", "int", false, true),
            ],
            vec![],
            vec![],
        );

        let sql = CreateTable::from_def(&def).to_sql();
        assert_eq!(
            sql,
            "CREATE TABLE events (\ne int,\na int,\nc int,\nb int,\nd int\n);"
        );
    }

    #[test]
    fn test_suffixes_applied_iff_flagged() {
        let def = def(
            vec![
                column("id", "bigint", true, false),
                column("email", "varchar(255)", true, true),
                column("note", "varchar(255)", false, false),
                column("payload", "varchar(1024)", false, true),
            ],
            vec![],
            vec![],
        );

        let sql = CreateTable::from_def(&def).to_sql();
        assert!(sql.contains("id bigint UNIQUE NOT NULL,"));
        assert!(sql.contains("email varchar(255) UNIQUE,"));
        assert!(sql.contains("note varchar(255) NOT NULL,"));
        assert!(sql.contains("payload varchar(1024)\n);"));
    }

    #[test]
    fn test_unique_group_in_catalog_order() {
        let def = def(
            vec![column("a", "int", false, true), column("b", "int", false, true)],
            vec!["b", "a"],
            vec![],
        );

        let sql = CreateTable::from_def(&def).to_sql();
        assert!(sql.ends_with(",\nUNIQUE (b, a)\n);"));
    }

    #[test]
    fn test_primary_key_group_renders_as_second_unique() {
        let def = def(
            vec![column("a", "int", false, true)],
            vec!["a"],
            vec!["a"],
        );

        let sql = CreateTable::from_def(&def).to_sql();
        // The primary-key group is rendered as a UNIQUE constraint; no
        // PRIMARY KEY clause is ever emitted.
        assert!(sql.ends_with(",\nUNIQUE (a),\nUNIQUE (a)\n);"));
        assert!(!sql.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_no_groups_no_trailing_constraints() {
        let def = def(vec![column("a", "int", false, true)], vec![], vec![]);
        let sql = CreateTable::from_def(&def).to_sql();
        assert_eq!(sql, "CREATE TABLE events (\na int\n);");
    }

    #[test]
    fn test_statement_is_deterministic() {
        let def = def(
            vec![column("a", "int", true, false), column("b", "int", false, true)],
            vec!["a", "b"],
            vec!["a"],
        );
        let first = CreateTable::from_def(&def).to_sql();
        let second = CreateTable::from_def(&def).to_sql();
        assert_eq!(first, second);
    }
}
