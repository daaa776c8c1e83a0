/// Formats a dollar amount the way the invoice prints it: "$9,600.00".
///
/// Rounds to whole cents; negative amounts get a leading minus ("-$50.00").
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    let sign = if cents < 0.0 { "-" } else { "" };
    let cents = cents.abs() as u64;

    let dollars = (cents / 100).to_string();
    let with_commas = dollars
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join(",");

    format!("{sign}${with_commas}.{:02}", cents % 100)
}
