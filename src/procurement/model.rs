use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A numeric field as typed by the user.
///
/// The text is parsed once, when it enters the model. Text that is empty, only partly numeric
/// or not finite has no value and counts as zero in every computation. The original text is
/// kept so it can be shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Amount {
    text: String,
    value: Option<f64>,
}

impl Amount {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());
        Self { text, value }
    }

    /// The text exactly as it was entered.
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// The parsed number, if the text was a valid decimal.
    pub fn parsed(&self) -> Option<f64> {
        self.value
    }

    /// The number used for computation: unparsable text counts as zero.
    pub fn value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<String> for Amount {
    fn from(text: String) -> Self {
        Self::parse(text)
    }
}

impl From<&str> for Amount {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::InProgress,
        RequestStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// One requested good or service on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    #[serde(default)]
    #[schema(example = "SP-0012")]
    pub stock_or_property_number: String,
    #[serde(default)]
    #[schema(example = "box")]
    pub unit: String,
    #[serde(default)]
    #[schema(example = "Bond paper, A4, 500 sheets")]
    pub description: String,
    #[serde(default)]
    #[schema(value_type = String, example = "3")]
    pub quantity: Amount,
    #[serde(default)]
    #[schema(value_type = String, example = "150.50")]
    pub unit_cost: Amount,
}

impl LineItem {
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            stock_or_property_number: String::new(),
            unit: String::new(),
            description: String::new(),
            quantity: Amount::default(),
            unit_cost: Amount::default(),
        }
    }

    pub fn text(&self, column: ItemColumn) -> &str {
        match column {
            ItemColumn::StockOrPropertyNumber => &self.stock_or_property_number,
            ItemColumn::Unit => &self.unit,
            ItemColumn::Description => &self.description,
            ItemColumn::Quantity => self.quantity.as_text(),
            ItemColumn::UnitCost => self.unit_cost.as_text(),
        }
    }

    pub fn set(&mut self, column: ItemColumn, value: impl Into<String>) {
        let value = value.into();
        match column {
            ItemColumn::StockOrPropertyNumber => self.stock_or_property_number = value,
            ItemColumn::Unit => self.unit = value,
            ItemColumn::Description => self.description = value,
            ItemColumn::Quantity => self.quantity = Amount::parse(value),
            ItemColumn::UnitCost => self.unit_cost = Amount::parse(value),
        }
    }
}

/// The editable fields of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ItemColumn {
    StockOrPropertyNumber,
    Unit,
    Description,
    Quantity,
    UnitCost,
}

/// The free-text header and signature fields of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum HeaderField {
    EntityName,
    FundCluster,
    Office,
    RequestNumber,
    Date,
    ResponsibilityCenterCode,
    Purpose,
    RequestedByName,
    RequestedByDesignation,
    ApprovedByName,
    ApprovedByDesignation,
}

/// An Appendix 60 purchase request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementRequest {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    #[schema(example = "Department of Agrarian Reform")]
    pub entity_name: String,
    #[serde(default)]
    #[schema(example = "01")]
    pub fund_cluster: String,
    #[serde(default)]
    #[schema(example = "Procurement")]
    pub office: String,
    #[serde(default)]
    #[schema(example = "PR-2026-001")]
    pub request_number: String,
    #[serde(default)]
    #[schema(example = "2026-02-01")]
    pub date: String,
    #[serde(default)]
    pub responsibility_center_code: String,
    #[serde(default)]
    pub purpose: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub requested_by_name: String,
    #[serde(default)]
    pub requested_by_designation: String,
    #[serde(default)]
    pub approved_by_name: String,
    #[serde(default)]
    pub approved_by_designation: String,
    #[serde(default)]
    pub status: RequestStatus,
}

impl ProcurementRequest {
    /// A fresh request: one blank line, status Pending, dated today.
    pub fn new_empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            entity_name: String::new(),
            fund_cluster: String::new(),
            office: String::new(),
            request_number: String::new(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            responsibility_center_code: String::new(),
            purpose: String::new(),
            items: vec![LineItem::blank()],
            requested_by_name: String::new(),
            requested_by_designation: String::new(),
            approved_by_name: String::new(),
            approved_by_designation: String::new(),
            status: RequestStatus::Pending,
        }
    }

    pub fn field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::EntityName => &self.entity_name,
            HeaderField::FundCluster => &self.fund_cluster,
            HeaderField::Office => &self.office,
            HeaderField::RequestNumber => &self.request_number,
            HeaderField::Date => &self.date,
            HeaderField::ResponsibilityCenterCode => &self.responsibility_center_code,
            HeaderField::Purpose => &self.purpose,
            HeaderField::RequestedByName => &self.requested_by_name,
            HeaderField::RequestedByDesignation => &self.requested_by_designation,
            HeaderField::ApprovedByName => &self.approved_by_name,
            HeaderField::ApprovedByDesignation => &self.approved_by_designation,
        }
    }

    pub fn set_field(&mut self, field: HeaderField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            HeaderField::EntityName => &mut self.entity_name,
            HeaderField::FundCluster => &mut self.fund_cluster,
            HeaderField::Office => &mut self.office,
            HeaderField::RequestNumber => &mut self.request_number,
            HeaderField::Date => &mut self.date,
            HeaderField::ResponsibilityCenterCode => &mut self.responsibility_center_code,
            HeaderField::Purpose => &mut self.purpose,
            HeaderField::RequestedByName => &mut self.requested_by_name,
            HeaderField::RequestedByDesignation => &mut self.requested_by_designation,
            HeaderField::ApprovedByName => &mut self.approved_by_name,
            HeaderField::ApprovedByDesignation => &mut self.approved_by_designation,
        };
        *slot = value;
    }

    /// The item at `index`, or a blank row when the index is past the populated items.
    pub fn item_or_blank(&self, index: usize) -> std::borrow::Cow<'_, LineItem> {
        match self.items.get(index) {
            Some(item) => std::borrow::Cow::Borrowed(item),
            None => std::borrow::Cow::Owned(LineItem::blank()),
        }
    }
}

/// One row of the records table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: Uuid,
    pub request_number: String,
    pub first_description: String,
    pub office: String,
    pub total_quantity: f64,
    pub grand_total: f64,
    pub date: String,
    pub status: RequestStatus,
    pub saved_at: DateTime<Utc>,
}

/// Partial update of the header fields of a saved request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcurementRequest {
    pub entity_name: Option<String>,
    pub fund_cluster: Option<String>,
    pub office: Option<String>,
    pub request_number: Option<String>,
    pub date: Option<String>,
    pub responsibility_center_code: Option<String>,
    pub purpose: Option<String>,
    pub requested_by_name: Option<String>,
    pub requested_by_designation: Option<String>,
    pub approved_by_name: Option<String>,
    pub approved_by_designation: Option<String>,
    pub status: Option<RequestStatus>,
}

impl UpdateProcurementRequest {
    /// The header fields present in this update, paired with their new values.
    pub fn header_changes(&self) -> Vec<(HeaderField, &str)> {
        [
            (HeaderField::EntityName, &self.entity_name),
            (HeaderField::FundCluster, &self.fund_cluster),
            (HeaderField::Office, &self.office),
            (HeaderField::RequestNumber, &self.request_number),
            (HeaderField::Date, &self.date),
            (HeaderField::ResponsibilityCenterCode, &self.responsibility_center_code),
            (HeaderField::Purpose, &self.purpose),
            (HeaderField::RequestedByName, &self.requested_by_name),
            (HeaderField::RequestedByDesignation, &self.requested_by_designation),
            (HeaderField::ApprovedByName, &self.approved_by_name),
            (HeaderField::ApprovedByDesignation, &self.approved_by_designation),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Partial update of one line item.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineItemRequest {
    pub stock_or_property_number: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit_cost: Option<String>,
}

impl UpdateLineItemRequest {
    pub fn column_changes(&self) -> Vec<(ItemColumn, &str)> {
        [
            (ItemColumn::StockOrPropertyNumber, &self.stock_or_property_number),
            (ItemColumn::Unit, &self.unit),
            (ItemColumn::Description, &self.description),
            (ItemColumn::Quantity, &self.quantity),
            (ItemColumn::UnitCost, &self.unit_cost),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }
}
