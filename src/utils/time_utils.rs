use chrono::{Local, NaiveDate};

// Read dates travel as plain calendar dates, e.g. 2023-01-01.
// chrono formatting reference:
// https://docs.rs/chrono/latest/chrono/format/strftime/index.html
pub const DATE_FORMAT_USCOMPACT: &'static str = "%Y-%m-%d";

// "Today" is the server (or client) local date, the same
// thing a browser date input would consider today.
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

pub fn date_to_string(date: &NaiveDate) -> String {
  date.format(DATE_FORMAT_USCOMPACT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), DATE_FORMAT_USCOMPACT).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_formats_as_expected() {
    let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
    assert_eq!("2023-01-05", date_to_string(&date));
  }

  #[test]
  fn parse_date_accepts_padded_input() {
    assert_eq!(
      NaiveDate::from_ymd_opt(2021, 3, 7),
      parse_date(" 2021-03-07 ")
    );
  }

  #[test]
  fn parse_date_rejects_other_formats() {
    assert_eq!(None, parse_date("07/03/2021"));
    assert_eq!(None, parse_date("2021-02-30"));
    assert_eq!(None, parse_date(""));
  }
}
