//! Tests for MySQL value conversion

use super::*;

mod binding {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_params_use_text_protocol() {
        assert!(matches!(to_params(&[]), Params::Empty));
    }

    #[test]
    fn test_params_bound_positionally() {
        let params = to_params(&[Value::from("admin"), Value::Int64(42), Value::Null]);
        match params {
            Params::Positional(values) => assert_eq!(
                values,
                vec![
                    mysql_async::Value::Bytes(b"admin".to_vec()),
                    mysql_async::Value::Int(42),
                    mysql_async::Value::NULL,
                ]
            ),
            other => panic!("expected positional params, got {:?}", other),
        }
    }

    #[test]
    fn test_datetime_binding() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(13, 5, 7, 250)
            .unwrap();
        assert_eq!(
            value_to_mysql(&Value::DateTime(dt)),
            mysql_async::Value::Date(2024, 3, 9, 13, 5, 7, 250)
        );
    }
}

mod decoding {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_protocol_integers() {
        let v = mysql_value_to_value(
            mysql_async::Value::Bytes(b"17".to_vec()),
            ColumnType::MYSQL_TYPE_LONGLONG,
        );
        assert_eq!(v, Value::Int64(17));
    }

    #[test]
    fn test_decimal_kept_as_text() {
        let v = mysql_value_to_value(
            mysql_async::Value::Bytes(b"12.50".to_vec()),
            ColumnType::MYSQL_TYPE_NEWDECIMAL,
        );
        assert_eq!(v, Value::Decimal("12.50".to_string()));
    }

    #[test]
    fn test_explain_json_column_is_text() {
        let json = br#"{"query_block":{"select_id":1}}"#.to_vec();
        let v = mysql_value_to_value(
            mysql_async::Value::Bytes(json),
            ColumnType::MYSQL_TYPE_VAR_STRING,
        );
        assert_eq!(v.to_text(), Some(r#"{"query_block":{"select_id":1}}"#.to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_bytes() {
        let v = mysql_value_to_value(
            mysql_async::Value::Bytes(vec![0xff, 0xfe]),
            ColumnType::MYSQL_TYPE_BLOB,
        );
        assert_eq!(v, Value::Bytes(vec![0xff, 0xfe]));
    }

    #[test]
    fn test_date_without_time() {
        let v = mysql_value_to_value(
            mysql_async::Value::Date(2023, 12, 31, 0, 0, 0, 0),
            ColumnType::MYSQL_TYPE_DATE,
        );
        assert_eq!(
            v,
            Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        );
    }

    #[test]
    fn test_large_unsigned() {
        let v = mysql_value_to_value(mysql_async::Value::UInt(u64::MAX), ColumnType::MYSQL_TYPE_LONGLONG);
        assert_eq!(v, Value::Decimal(u64::MAX.to_string()));
    }
}
