//! 宽松的数值反序列化
//!
//! 查询字符串和表单中的值都是字符串，JSON 中可能是数字也可能是字符串，
//! 这里的函数把两种写法统一成数值。

use serde::Deserializer;
use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value <= i64::MAX as u64 {
            Ok(Some(value as i64))
        } else {
            Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
        }
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
            Ok(Some(value as i64))
        } else {
            Err(Error::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(I64Visitor)
    }
}

struct F64Visitor;

impl<'de> Visitor<'de> for F64Visitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or a string containing a number")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value as f64))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value as f64))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
        }
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(F64Visitor)
    }
}

struct BoolVisitor;

impl<'de> Visitor<'de> for BoolVisitor {
    type Value = Option<bool>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean or one of \"true\", \"false\", \"1\", \"0\"")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value != 0))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(value != 0))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
        }
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BoolVisitor)
    }
}

/// 可选整数，接受数字或数字字符串，空字符串视为缺省
pub fn deserialize_option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(I64Visitor)
}

/// 必填整数
pub fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(I64Visitor)?
        .ok_or_else(|| D::Error::custom("expected an integer"))
}

/// 可选 32 位整数，超出范围视为非法参数
pub fn deserialize_option_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(I64Visitor)?
        .map(narrow_i32::<D::Error>)
        .transpose()
}

/// 必填 32 位整数
pub fn deserialize_string_to_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option_i32(deserializer)?.ok_or_else(|| D::Error::custom("expected an integer"))
}

fn narrow_i32<E: Error>(value: i64) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| E::custom(format!("integer {value} is out of range")))
}

/// 可选浮点数
pub fn deserialize_option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(F64Visitor)
}

/// 必填浮点数
pub fn deserialize_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(F64Visitor)?
        .ok_or_else(|| D::Error::custom("expected a number"))
}

/// 可选布尔值
pub fn deserialize_option_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(BoolVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_option_i64")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_option_f64")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_option_bool")]
        flag: Option<bool>,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let s: Sample =
            serde_json::from_value(json!({"id": "42", "score": 7.5, "flag": "true"})).unwrap();
        assert_eq!(s.id, Some(42));
        assert_eq!(s.score, Some(7.5));
        assert_eq!(s.flag, Some(true));

        let s: Sample = serde_json::from_value(json!({"id": 3, "score": "9"})).unwrap();
        assert_eq!(s.id, Some(3));
        assert_eq!(s.score, Some(9.0));
        assert_eq!(s.flag, None);
    }

    #[test]
    fn test_empty_and_null_are_none() {
        let s: Sample = serde_json::from_value(json!({"id": "", "score": null})).unwrap();
        assert_eq!(s.id, None);
        assert_eq!(s.score, None);
    }

    #[derive(Debug, Deserialize)]
    struct Narrow {
        #[serde(deserialize_with = "deserialize_string_to_i32")]
        credits: i32,
        #[serde(default, deserialize_with = "deserialize_option_i32")]
        limit: Option<i32>,
    }

    #[test]
    fn test_i32_fields_reject_out_of_range() {
        let n: Narrow = serde_json::from_value(json!({"credits": "4", "limit": 60})).unwrap();
        assert_eq!(n.credits, 4);
        assert_eq!(n.limit, Some(60));

        let n: Narrow = serde_json::from_value(json!({"credits": 3, "limit": ""})).unwrap();
        assert_eq!(n.limit, None);

        // 不能截断成别的值
        assert!(serde_json::from_value::<Narrow>(json!({"credits": 4294967299i64})).is_err());
        assert!(
            serde_json::from_value::<Narrow>(json!({"credits": 3, "limit": 4294967296i64}))
                .is_err()
        );
        assert!(serde_json::from_value::<Narrow>(json!({"credits": "-2147483649"})).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_value::<Sample>(json!({"id": "abc"})).is_err());
        assert!(serde_json::from_value::<Sample>(json!({"score": "NaN"})).is_err());
        assert!(serde_json::from_value::<Sample>(json!({"id": 1.5})).is_err());
    }
}
