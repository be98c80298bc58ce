//! Attribute keys shared by the loader, analytics and agents.
//!
//! Attribute maps are free-form, but every component that reads a
//! type-specific value goes through these constants so the vocabulary
//! stays in one place.

// Common
pub const NAME: &str = "name";

// Product
pub const SKU: &str = "sku";
pub const CATEGORY: &str = "category";
pub const WEIGHT: &str = "weight";
pub const VOLUME: &str = "volume";
pub const COST: &str = "cost";
pub const SAFETY_STOCK_LEVEL: &str = "safetyStockLevel";
pub const LEAD_TIME: &str = "leadTime";

// Location
pub const CAPACITY: &str = "capacity";
pub const COORDINATES: &str = "coordinates";
pub const OPERATING_HOURS: &str = "operatingHours";
pub const LOCATION_KIND: &str = "locationKind";
pub const ADDRESS: &str = "address";
pub const TEMPERATURE_ZONE: &str = "temperatureZone";

// Supplier / Customer / Employee
pub const RELIABILITY_SCORE: &str = "reliabilityScore";
pub const CONTACT_INFO: &str = "contactInfo";
pub const CUSTOMER_KIND: &str = "customerKind";
pub const ROLE: &str = "role";

// Order
pub const CUSTOMER_ID: &str = "customerId";
pub const STATUS: &str = "status";
pub const ORDER_DATE: &str = "orderDate";
pub const REQUESTED_DELIVERY_DATE: &str = "requestedDeliveryDate";
pub const TOTAL_VALUE: &str = "totalValue";

// Shipment
pub const ORDER_ID: &str = "orderId";
pub const ORIGIN_ID: &str = "originId";
pub const DESTINATION_ID: &str = "destinationId";
pub const VEHICLE_ID: &str = "vehicleId";
pub const QUANTITY: &str = "quantity";
pub const SCHEDULED_ARRIVAL: &str = "scheduledArrival";
pub const ACTUAL_ARRIVAL: &str = "actualArrival";

// Vehicle / Machine
pub const VEHICLE_KIND: &str = "vehicleKind";
pub const MAX_WEIGHT: &str = "maxWeight";
pub const MACHINE_KIND: &str = "machineKind";
pub const CAPACITY_PER_HOUR: &str = "capacityPerHour";
pub const OPERATIONAL_STATUS: &str = "operationalStatus";

// Inventory
pub const PRODUCT_ID: &str = "productId";
pub const LOCATION_ID: &str = "locationId";
pub const QUANTITY_AVAILABLE: &str = "quantityAvailable";
pub const QUANTITY_RESERVED: &str = "quantityReserved";
pub const LAST_UPDATED: &str = "lastUpdated";

// Relationship weights
pub const FLOW: &str = "flow";

/// Order status values.
pub mod order_status {
    pub const PENDING: &str = "pending";
    pub const PROCESSING: &str = "processing";
    pub const SHIPPED: &str = "shipped";
    pub const DELIVERED: &str = "delivered";
    pub const CANCELLED: &str = "cancelled";
}

/// Shipment status values.
pub mod shipment_status {
    pub const SCHEDULED: &str = "scheduled";
    pub const IN_TRANSIT: &str = "in_transit";
    pub const DELIVERED: &str = "delivered";
    pub const DELAYED: &str = "delayed";
}

/// Location kinds.
pub mod location_kind {
    pub const WAREHOUSE: &str = "warehouse";
    pub const FACTORY: &str = "factory";
    pub const PORT: &str = "port";
    pub const RETAIL_STORE: &str = "retail_store";
    pub const DISTRIBUTION_CENTER: &str = "distribution_center";
}
