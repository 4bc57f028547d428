// Conversions between display amounts ("0.0015") and the smallest unit.

pub fn parse_amount(text: &str, decimals: u32) -> Result<u64, String> {
    let text = text.trim();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("Invalid amount: '{}'", text));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("Invalid amount: '{}'", text));
    }
    if frac_part.len() > decimals as usize {
        return Err(format!(
            "Amount {} has more than {} decimal places",
            text, decimals
        ));
    }

    let scale = 10u64
        .checked_pow(decimals)
        .ok_or_else(|| format!("Unsupported decimals: {}", decimals))?;
    let int_value = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse::<u64>()
            .map_err(|e| format!("Invalid amount {}: {}", text, e))?
    };
    let frac_value = if frac_part.is_empty() {
        0
    } else {
        format!("{:0<width$}", frac_part, width = decimals as usize)
            .parse::<u64>()
            .map_err(|e| format!("Invalid amount {}: {}", text, e))?
    };

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| format!("Amount {} is too large", text))
}

pub fn format_amount(amount: u64, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let scale = 10u64.pow(decimals);
    format!(
        "{}.{:0width$}",
        amount / scale,
        amount % scale,
        width = decimals as usize
    )
}

pub fn to_coin(amount: u64, decimals: u32) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

pub fn fiat_value(amount: u64, decimals: u32, price: f64) -> f64 {
    to_coin(amount, decimals) * price
}

// Bounds shared by deposits and withdrawals.
pub fn check_amount_range(amount: u64, min: u64, max: u64, decimals: u32) -> Result<(), String> {
    if amount == 0 {
        return Err("Amount must be greater than zero".to_string());
    }
    if amount < min {
        return Err(format!(
            "Amount {} is below the minimum of {}",
            format_amount(amount, decimals),
            format_amount(min, decimals)
        ));
    }
    if amount > max {
        return Err(format!(
            "Amount {} exceeds the available {}",
            format_amount(amount, decimals),
            format_amount(max, decimals)
        ));
    }

    Ok(())
}
