use std::fmt;

/// One field of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    /// Report identifier.
    Id,
    /// Customer order number.
    OrderNumber,
    /// Customer or buyer.
    Client,
    /// Customer e-mail address.
    ClientEmail,
    /// Product brand.
    Brand,
    /// Returned part.
    Part,
    /// Return reason.
    Reason,
    /// Processing status.
    Status,
    /// Internal comment.
    Comment,
    /// Last-save timestamp.
    Timestamp,
}

impl ReportField {
    /// Every field, in resolution order.
    pub const ALL: [ReportField; 10] = [
        ReportField::Id,
        ReportField::OrderNumber,
        ReportField::Client,
        ReportField::ClientEmail,
        ReportField::Brand,
        ReportField::Part,
        ReportField::Reason,
        ReportField::Status,
        ReportField::Comment,
        ReportField::Timestamp,
    ];

    /// The nine columns written by CSV export, in column order.
    pub const EXPORT_COLUMNS: [ReportField; 9] = [
        ReportField::Id,
        ReportField::OrderNumber,
        ReportField::Client,
        ReportField::Brand,
        ReportField::Part,
        ReportField::Reason,
        ReportField::Status,
        ReportField::Comment,
        ReportField::Timestamp,
    ];

    /// Key used in persisted JSON.
    pub fn key(self) -> &'static str {
        match self {
            ReportField::Id => "id",
            ReportField::OrderNumber => "orderNumber",
            ReportField::Client => "client",
            ReportField::ClientEmail => "clientEmail",
            ReportField::Brand => "brand",
            ReportField::Part => "part",
            ReportField::Reason => "reason",
            ReportField::Status => "status",
            ReportField::Comment => "comment",
            ReportField::Timestamp => "timestamp",
        }
    }

    /// Header written for this field by CSV export.
    pub fn export_header(self) -> &'static str {
        match self {
            ReportField::Id => "ID Interno",
            ReportField::OrderNumber => "Número de pedido",
            ReportField::Client => "Cliente / Comprador",
            ReportField::ClientEmail => "Email",
            ReportField::Brand => "Marca",
            ReportField::Part => "Pieza",
            ReportField::Reason => "Motivo de devolución",
            ReportField::Status => "Estado",
            ReportField::Comment => "Comentario interno",
            ReportField::Timestamp => "Fecha",
        }
    }

    /// Candidate header names, lower-case, tried in order during import.
    ///
    /// The export header of every field is always among its candidates.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            ReportField::Id => &["id", "id interno", "internal id"],
            ReportField::OrderNumber => &[
                "ordernumber",
                "número de pedido",
                "numero de pedido",
                "order number",
                "order",
                "pedido",
            ],
            ReportField::Client => &[
                "client",
                "cliente / comprador",
                "cliente",
                "comprador",
                "buyer",
            ],
            ReportField::ClientEmail => &["clientemail", "client email", "email", "correo"],
            ReportField::Brand => &["brand", "marca"],
            ReportField::Part => &["part", "pieza", "referencia", "reference"],
            ReportField::Reason => &[
                "reason",
                "motivo de devolución",
                "motivo de devolucion",
                "motivo",
            ],
            ReportField::Status => &["status", "estado"],
            ReportField::Comment => &["comment", "comentario interno", "comentario", "notes"],
            ReportField::Timestamp => &["timestamp", "fecha", "date"],
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_header_resolves_through_synonyms() {
        for field in ReportField::ALL {
            let header = field.export_header().to_lowercase();
            assert!(
                field.synonyms().contains(&header.as_str()),
                "{} header '{}' missing from synonyms",
                field,
                header
            );
        }
    }

    #[test]
    fn test_json_key_resolves_through_synonyms() {
        for field in ReportField::ALL {
            let key = field.key().to_lowercase();
            assert!(field.synonyms().contains(&key.as_str()));
        }
    }

    #[test]
    fn test_synonyms_are_lower_case() {
        for field in ReportField::ALL {
            for candidate in field.synonyms() {
                assert_eq!(*candidate, candidate.to_lowercase());
            }
        }
    }

    #[test]
    fn test_export_columns_skip_email() {
        assert!(!ReportField::EXPORT_COLUMNS.contains(&ReportField::ClientEmail));
        assert_eq!(ReportField::EXPORT_COLUMNS[0], ReportField::Id);
        assert_eq!(ReportField::EXPORT_COLUMNS[8], ReportField::Timestamp);
    }
}
