use rust_decimal::Decimal;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 5;

const PRICE_MAX_DIGITS: u32 = 5;
const PRICE_DECIMAL_PLACES: u32 = 2;

const BLANK: &str = "This field may not be blank.";
const TOO_LONG: &str = "Ensure this field has no more than 255 characters.";
const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";

/// Trims the address and lower-cases its domain part.
pub fn normalize_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(BLANK);
    }
    if email.chars().count() > MAX_NAME_LENGTH {
        return Err(TOO_LONG);
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) =>
        {
            Ok(format!("{}@{}", local, domain.to_lowercase()))
        }
        _ => Err("Enter a valid email address."),
    }
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        Err(BLANK)
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Err("Ensure this field has at least 5 characters.")
    } else {
        Ok(())
    }
}

/// Names, titles and the like: non-blank and at most 255 characters.
pub fn validate_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        Err(BLANK)
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Err(TOO_LONG)
    } else {
        Ok(name.to_owned())
    }
}

/// Links may be blank.
pub fn validate_link(link: &str) -> Result<String, &'static str> {
    let link = link.trim();
    if link.chars().count() > MAX_NAME_LENGTH {
        Err(TOO_LONG)
    } else {
        Ok(link.to_owned())
    }
}

pub fn validate_minutes(minutes: i32) -> Result<i32, &'static str> {
    if minutes < 0 {
        Err(NEGATIVE)
    } else {
        Ok(minutes)
    }
}

/// Accepts non-negative amounts with at most five digits, two of them after the decimal point.
/// The result always carries two decimal places.
pub fn validate_price(price: Decimal) -> Result<Decimal, &'static str> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(NEGATIVE);
    }

    let normalized = price.normalize();
    let decimals = normalized.scale();
    let digits = (normalized.mantissa().unsigned_abs().to_string().len() as u32).max(decimals);
    let whole_digits = digits - decimals;

    if digits > PRICE_MAX_DIGITS {
        return Err("Ensure that there are no more than 5 digits in total.");
    }
    if decimals > PRICE_DECIMAL_PLACES {
        return Err("Ensure that there are no more than 2 decimal places.");
    }
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err("Ensure that there are no more than 3 digits before the decimal point.");
    }

    let mut price = normalized;
    price.rescale(PRICE_DECIMAL_PLACES);
    Ok(price)
}
