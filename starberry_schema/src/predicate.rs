use crate::schema::FieldDefinition;

/// Decides whether a field is a paginated connection.
///
/// Rules treat this as an opaque oracle, so a schema compiler with its own
/// notion of connections can plug it in.
pub trait ConnectionPredicate: Send + Sync {
    fn is_connection(&self, field: &FieldDefinition) -> bool;
}

/// Default predicate: a field is a connection when its kind says so.
#[derive(Debug, Clone, Copy, Default)]
pub struct KindPredicate;

impl ConnectionPredicate for KindPredicate {
    fn is_connection(&self, field: &FieldDefinition) -> bool {
        field.is_connection()
    }
}

impl<F> ConnectionPredicate for F
where
    F: Fn(&FieldDefinition) -> bool + Send + Sync,
{
    fn is_connection(&self, field: &FieldDefinition) -> bool {
        self(field)
    }
}
