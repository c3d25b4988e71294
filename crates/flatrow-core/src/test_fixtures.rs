//! Hand-written record fixtures shared by the unit tests. These spell
//! out exactly the impls the derive macros generate.

use crate::error::CodecError;
use crate::flatten::join_key;
use crate::metadata::FieldDeclaration;
use crate::property::PropertyNode;
use crate::traits::{Record, TableEntity};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Geo {
    pub lat: f64,
    pub lon: f64,
}

impl Record for Geo {
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError> {
        <f64 as Record>::declare_fields(&join_key(prefix, "lat")?, out)?;
        <f64 as Record>::declare_fields(&join_key(prefix, "lon")?, out)?;
        Ok(())
    }

    fn to_node(&self) -> PropertyNode {
        PropertyNode::Object(vec![
            ("lat".to_string(), self.lat.to_node()),
            ("lon".to_string(), self.lon.to_node()),
        ])
    }

    fn from_node(node: Option<&PropertyNode>) -> Self {
        Self {
            lat: Record::from_node(node.and_then(|n| n.get("lat"))),
            lon: Record::from_node(node.and_then(|n| n.get("lon"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Origin {
    pub city: String,
    pub geo: Geo,
}

impl Record for Origin {
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError> {
        <String as Record>::declare_fields(&join_key(prefix, "city")?, out)?;
        <Geo as Record>::declare_fields(&join_key(prefix, "geo")?, out)?;
        Ok(())
    }

    fn to_node(&self) -> PropertyNode {
        PropertyNode::Object(vec![
            ("city".to_string(), self.city.to_node()),
            ("geo".to_string(), self.geo.to_node()),
        ])
    }

    fn from_node(node: Option<&PropertyNode>) -> Self {
        Self {
            city: Record::from_node(node.and_then(|n| n.get("city"))),
            geo: Record::from_node(node.and_then(|n| n.get("geo"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Shipment {
    pub key: String,
    pub int_value: i32,
    pub long_value: Option<i64>,
    pub string_value: String,
    pub offset_value: DateTime<FixedOffset>,
    pub origin: Origin,
}

impl Record for Shipment {
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError> {
        <String as Record>::declare_fields(&join_key(prefix, "key")?, out)?;
        <i32 as Record>::declare_fields(&join_key(prefix, "int_value")?, out)?;
        <Option<i64> as Record>::declare_fields(&join_key(prefix, "long_value")?, out)?;
        <String as Record>::declare_fields(&join_key(prefix, "string_value")?, out)?;
        <DateTime<FixedOffset> as Record>::declare_fields(
            &join_key(prefix, "offset_value")?,
            out,
        )?;
        <Origin as Record>::declare_fields(&join_key(prefix, "origin")?, out)?;
        Ok(())
    }

    fn to_node(&self) -> PropertyNode {
        PropertyNode::Object(vec![
            ("key".to_string(), self.key.to_node()),
            ("int_value".to_string(), self.int_value.to_node()),
            ("long_value".to_string(), self.long_value.to_node()),
            ("string_value".to_string(), self.string_value.to_node()),
            ("offset_value".to_string(), self.offset_value.to_node()),
            ("origin".to_string(), self.origin.to_node()),
        ])
    }

    fn from_node(node: Option<&PropertyNode>) -> Self {
        Self {
            key: Record::from_node(node.and_then(|n| n.get("key"))),
            int_value: Record::from_node(node.and_then(|n| n.get("int_value"))),
            long_value: Record::from_node(node.and_then(|n| n.get("long_value"))),
            string_value: Record::from_node(node.and_then(|n| n.get("string_value"))),
            offset_value: Record::from_node(node.and_then(|n| n.get("offset_value"))),
            origin: Record::from_node(node.and_then(|n| n.get("origin"))),
        }
    }
}

impl TableEntity for Shipment {
    const PARTITION_SOURCE: &'static str = "key";
    const ROW_SOURCE: &'static str = "key";

    fn partition_key(&self) -> String {
        self.key.clone()
    }

    fn row_key(&self) -> String {
        self.key.clone()
    }

    fn restore_keys(&mut self, _partition_key: &str, row_key: &str) {
        self.key = row_key.to_string();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Inventory {
    pub sku: String,
    pub count: i64,
    pub price: Decimal,
    pub restocked: Option<NaiveDate>,
}

impl Record for Inventory {
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError> {
        <String as Record>::declare_fields(&join_key(prefix, "sku")?, out)?;
        <i64 as Record>::declare_fields(&join_key(prefix, "count")?, out)?;
        <Decimal as Record>::declare_fields(&join_key(prefix, "price")?, out)?;
        <Option<NaiveDate> as Record>::declare_fields(&join_key(prefix, "restocked")?, out)?;
        Ok(())
    }

    fn to_node(&self) -> PropertyNode {
        PropertyNode::Object(vec![
            ("sku".to_string(), self.sku.to_node()),
            ("count".to_string(), self.count.to_node()),
            ("price".to_string(), self.price.to_node()),
            ("restocked".to_string(), self.restocked.to_node()),
        ])
    }

    fn from_node(node: Option<&PropertyNode>) -> Self {
        Self {
            sku: Record::from_node(node.and_then(|n| n.get("sku"))),
            count: Record::from_node(node.and_then(|n| n.get("count"))),
            price: Record::from_node(node.and_then(|n| n.get("price"))),
            restocked: Record::from_node(node.and_then(|n| n.get("restocked"))),
        }
    }
}
