//! Wire format of the AMap `v3/weather/weatherInfo` endpoint.

use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{Extensions, ForecastWeather, LiveWeather, WeatherData},
};

pub const DEFAULT_ENDPOINT: &str = "https://restapi.amap.com/v3/weather/weatherInfo";

/// Top-level `status` of a successful response.
const STATUS_OK: &str = "1";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: Option<String>,
    info: Option<String>,
    infocode: Option<String>,
    lives: Option<Value>,
    forecasts: Option<Value>,
}

/// Decode a response body into the record requested by `extensions`.
pub(crate) fn decode(body: &str, extensions: Extensions) -> Result<WeatherData, WeatherError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(WeatherError::malformed)?;

    if envelope.status.as_deref() != Some(STATUS_OK) {
        return Err(WeatherError::Api {
            info: envelope.info.unwrap_or_else(|| "unknown error".to_string()),
            infocode: envelope.infocode,
        });
    }

    match extensions {
        Extensions::Base => first::<LiveWeather>(envelope.lives, extensions).map(WeatherData::Live),
        Extensions::All => {
            first::<ForecastWeather>(envelope.forecasts, extensions).map(WeatherData::Forecast)
        }
    }
}

/// The provider returns at most one record per adcode; only the first is used.
fn first<T: DeserializeOwned>(records: Option<Value>, extensions: Extensions) -> Result<T, WeatherError> {
    let record = match records {
        None | Some(Value::Null) => return Err(WeatherError::NoData(extensions)),
        Some(Value::Array(records)) => records
            .into_iter()
            .next()
            .ok_or(WeatherError::NoData(extensions))?,
        Some(other) => {
            return Err(WeatherError::malformed(format!(
                "expected an array of {} records, found {other}",
                extensions.kind()
            )));
        }
    };

    serde_json::from_value(record).map_err(WeatherError::malformed)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Num(serde_json::Number),
    List(Vec<Value>),
}

/// AMap renders blank text fields as `[]` and occasionally sends bare numbers.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Text::deserialize(deserializer)? {
        Text::Str(s) => Ok(s),
        Text::Num(n) => Ok(n.to_string()),
        Text::List(items) if items.is_empty() => Ok(String::new()),
        Text::List(_) => Err(D::Error::custom("expected text, found a non-empty array")),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::model::ErrorCode;
    use serde_json::json;

    #[test]
    fn decodes_first_live_record() {
        let data = decode(&live_body().to_string(), Extensions::Base).expect("live record");

        let WeatherData::Live(live) = &data else {
            panic!("expected live data, got {data:?}");
        };
        assert_eq!(live.province, "北京");
        assert_eq!(live.city, "东城区");
        assert_eq!(live.weather, "阴");
        assert_eq!(live.temperature, "13");
        assert_eq!(live.humidity, "69");
        assert_eq!(live.reporttime, "2025-10-17 10:33:26");
    }

    #[test]
    fn decodes_forecast_casts_in_order() {
        let data = decode(&forecast_body().to_string(), Extensions::All).expect("forecast record");

        let WeatherData::Forecast(forecast) = &data else {
            panic!("expected forecast data, got {data:?}");
        };
        let dates: Vec<_> = forecast.casts.iter().map(|c| c.date.as_str()).collect();
        assert_eq!(dates, ["2025-10-17", "2025-10-18", "2025-10-19", "2025-10-20"]);
        assert_eq!(forecast.casts[0].nightweather, "小雨");
        assert_eq!(forecast.casts[3].daytemp, "14");
        assert_eq!(forecast.casts[1].day().map(|d| d.to_string()).as_deref(), Some("2025-10-18"));
        assert!(forecast.report_time().is_some());
    }

    #[test]
    fn failed_status_surfaces_infocode() {
        let body = error_body("INVALID_USER_KEY", "10001").to_string();
        let err = decode(&body, Extensions::Base).unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(err.infocode(), Some("10001"));
        assert!(err.to_string().contains("INVALID_USER_KEY"));
    }

    #[test]
    fn missing_status_is_an_api_error() {
        let err = decode(r#"{"lives": []}"#, Extensions::Base).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(err.infocode(), None);
    }

    #[test]
    fn unparseable_body_is_an_api_error() {
        let err = decode("<html>502 Bad Gateway</html>", Extensions::Base).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(err.infocode(), None);
    }

    #[test]
    fn empty_or_missing_records_are_no_data() {
        let empty = json!({"status": "1", "infocode": "10000", "lives": []}).to_string();
        assert_eq!(decode(&empty, Extensions::Base), Err(WeatherError::NoData(Extensions::Base)));

        // Asked for a forecast but only lives came back.
        let err = decode(&live_body().to_string(), Extensions::All).unwrap_err();
        assert_eq!(err, WeatherError::NoData(Extensions::All));

        let null = json!({"status": "1", "forecasts": null}).to_string();
        assert_eq!(decode(&null, Extensions::All).unwrap_err().code(), ErrorCode::NoData);
    }

    #[test]
    fn structural_mismatch_fails_closed() {
        let mut body = live_body();
        body["lives"][0].as_object_mut().unwrap().remove("weather");
        let err = decode(&body.to_string(), Extensions::Base).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(err.infocode(), None);

        let body = json!({"status": "1", "lives": {"city": "东城区"}}).to_string();
        assert_eq!(decode(&body, Extensions::Base).unwrap_err().code(), ErrorCode::ApiError);
    }

    #[test]
    fn tolerates_empty_arrays_and_bare_numbers() {
        let mut body = live_body();
        body["lives"][0]["winddirection"] = json!([]);
        body["lives"][0]["temperature"] = json!(13);

        let Ok(WeatherData::Live(live)) = decode(&body.to_string(), Extensions::Base) else {
            panic!("quirky live record should decode");
        };
        assert_eq!(live.winddirection, "");
        assert_eq!(live.temperature, "13");

        body["lives"][0]["winddirection"] = json!(["北"]);
        assert!(decode(&body.to_string(), Extensions::Base).is_err());
    }
}
