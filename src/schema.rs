//! Entity/table definitions consumed by schema create and drop
//!
//! The application registers its tables here; the engine applies them with
//! idempotent DDL. Registration order is preserved so foreign-key
//! dependencies hold: creation runs in order, dropping runs in reverse.

use tracing::warn;

/// A single table definition: a name, create DDL, and drop DDL.
///
/// The convenience constructor [`TableDefinition::create_if_absent`] wraps
/// a column list in `CREATE TABLE IF NOT EXISTS`, which keeps schema
/// creation idempotent. Raw DDL passed to [`TableDefinition::new`] should
/// do the same.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    name: String,
    create_sql: String,
    drop_sql: String,
}

impl TableDefinition {
    /// Define a table from raw create DDL; drop DDL defaults to
    /// `DROP TABLE IF EXISTS <name>`.
    pub fn new(name: impl Into<String>, create_sql: impl Into<String>) -> Self {
        let name = name.into();
        let drop_sql = format!("DROP TABLE IF EXISTS {}", name);
        Self {
            name,
            create_sql: create_sql.into(),
            drop_sql,
        }
    }

    /// Define a table from a column list, generating
    /// `CREATE TABLE IF NOT EXISTS <name> (<columns>)`.
    pub fn create_if_absent(name: impl Into<String>, columns_sql: &str) -> Self {
        let name = name.into();
        let create_sql = format!("CREATE TABLE IF NOT EXISTS {} ({})", name, columns_sql);
        Self::new(name, create_sql)
    }

    /// Override the generated drop DDL (e.g. to add CASCADE)
    pub fn with_drop_sql(mut self, drop_sql: impl Into<String>) -> Self {
        self.drop_sql = drop_sql.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_sql(&self) -> &str {
        &self.create_sql
    }

    pub fn drop_sql(&self) -> &str {
        &self.drop_sql
    }
}

/// Ordered collection of the application's table definitions
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Register a table definition. A re-registered name replaces the
    /// earlier definition in place, keeping its position in create order.
    pub fn register(&mut self, table: TableDefinition) -> &mut Self {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
            warn!("Table '{}' registered twice, replacing definition", table.name);
            *existing = table;
        } else {
            self.tables.push(table);
        }
        self
    }

    /// Tables in registration (creation) order
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    /// Tables in reverse registration order, for dropping
    pub fn tables_reversed(&self) -> impl Iterator<Item = &TableDefinition> {
        self.tables.iter().rev()
    }

    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_if_absent_generates_idempotent_ddl() {
        let table = TableDefinition::create_if_absent(
            "users",
            "id SERIAL PRIMARY KEY, email VARCHAR(255) NOT NULL",
        );

        assert_eq!(table.name(), "users");
        assert_eq!(
            table.create_sql(),
            "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, email VARCHAR(255) NOT NULL)"
        );
        assert_eq!(table.drop_sql(), "DROP TABLE IF EXISTS users");
    }

    #[test]
    fn test_custom_drop_sql() {
        let table = TableDefinition::new("orders", "CREATE TABLE IF NOT EXISTS orders (id INT)")
            .with_drop_sql("DROP TABLE IF EXISTS orders CASCADE");
        assert_eq!(table.drop_sql(), "DROP TABLE IF EXISTS orders CASCADE");
    }

    #[test]
    fn test_registry_preserves_order_and_reverses_for_drop() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(TableDefinition::create_if_absent("users", "id INT"))
            .register(TableDefinition::create_if_absent("orders", "id INT"))
            .register(TableDefinition::create_if_absent("order_items", "id INT"));

        let names: Vec<&str> = registry.tables().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["users", "orders", "order_items"]);

        let reversed: Vec<&str> = registry.tables_reversed().map(|t| t.name()).collect();
        assert_eq!(reversed, vec!["order_items", "orders", "users"]);
    }

    #[test]
    fn test_registry_replaces_duplicate_in_place() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(TableDefinition::create_if_absent("users", "id INT"))
            .register(TableDefinition::create_if_absent("orders", "id INT"))
            .register(TableDefinition::create_if_absent(
                "users",
                "id SERIAL PRIMARY KEY",
            ));

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.tables().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["users", "orders"]);
        assert!(registry
            .get("users")
            .unwrap()
            .create_sql()
            .contains("SERIAL PRIMARY KEY"));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(TableDefinition::create_if_absent("users", "id INT"));

        assert!(registry.get("users").is_some());
        assert!(registry.get("missing").is_none());
        assert!(!registry.is_empty());
    }
}
