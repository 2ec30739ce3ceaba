use axum::response::Html;

use crate::flash::Message;
use crate::forms::FieldError;
use crate::stocks::repo::Stock;

/// Escape text destined for HTML bodies or attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render integer cents back as dollars: 43217 -> "432.17".
pub fn dollars(cents: i32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn flashes(messages: &[Message]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| {
            format!(
                "    <li class=\"{}\">{}</li>\n",
                m.level.css_class(),
                escape(&m.text)
            )
        })
        .collect();
    format!("  <ul class=\"flashes\">\n{items}  </ul>\n")
}

fn nav(authenticated: bool) -> String {
    let account_links = if authenticated {
        "<a href=\"/users/profile\">Profile</a> <a href=\"/users/logout\">Log Out</a>"
    } else {
        "<a href=\"/users/register\">Register</a> <a href=\"/users/login\">Log In</a>"
    };
    let stock_links = if authenticated {
        " <a href=\"/add_stock\">Add Stock</a> <a href=\"/stocks/\">List Stocks</a>"
    } else {
        ""
    };
    format!(
        "  <nav>\n    <a href=\"/\">Home</a> <a href=\"/about\">About</a>{stock_links}\n    <span class=\"account\">{account_links}</span>\n  </nav>\n"
    )
}

fn layout(title: &str, authenticated: bool, messages: &[Message], body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title} | Stock Portfolio App</title>\n</head>\n<body>\n  <header><h1>Stock Portfolio App</h1></header>\n{nav}{flashes}  <main>\n{body}  </main>\n</body>\n</html>\n",
        title = escape(title),
        nav = nav(authenticated),
        flashes = flashes(messages),
    ))
}

/// Bracketed field notice, rendered next to the field label.
fn field_notice(errors: &[FieldError], field: &str) -> String {
    match errors.iter().find(|e| e.field == field) {
        Some(e) => format!(
            " <span class=\"field-error\">[{}]</span>",
            escape(&e.message)
        ),
        None => String::new(),
    }
}

pub fn index_page(authenticated: bool, messages: &[Message]) -> Html<String> {
    layout(
        "Home",
        authenticated,
        messages,
        "    <h2>Welcome to the Stock Portfolio App!</h2>\n    <p>Track the stocks you own: what you bought, how many shares, and at what price.</p>\n",
    )
}

pub fn about_page(authenticated: bool, messages: &[Message]) -> Html<String> {
    layout(
        "About",
        authenticated,
        messages,
        "    <h2>About</h2>\n    <p>This application is a personal stock portfolio tracker.</p>\n    <p>Built with the axum web framework.</p>\n",
    )
}

pub fn register_page(messages: &[Message], email: &str, errors: &[FieldError]) -> Html<String> {
    let body = format!(
        "    <h2>User Registration</h2>\n    <form method=\"post\" action=\"/users/register\">\n      <label for=\"email\">Email{email_notice}</label>\n      <input type=\"text\" id=\"email\" name=\"email\" value=\"{email}\">\n      <label for=\"password\">Password{password_notice}</label>\n      <input type=\"password\" id=\"password\" name=\"password\">\n      <button type=\"submit\">Register</button>\n    </form>\n",
        email = escape(email),
        email_notice = field_notice(errors, "email"),
        password_notice = field_notice(errors, "password"),
    );
    layout("Register", false, messages, &body)
}

pub fn login_page(
    messages: &[Message],
    email: &str,
    errors: &[FieldError],
    next: Option<&str>,
) -> Html<String> {
    let action = match next {
        Some(next) if !next.is_empty() => {
            format!("/users/login?next={}", urlencoding::encode(next))
        }
        _ => "/users/login".to_string(),
    };
    let body = format!(
        "    <h2>Log In</h2>\n    <form method=\"post\" action=\"{action}\">\n      <label for=\"email\">Email{email_notice}</label>\n      <input type=\"text\" id=\"email\" name=\"email\" value=\"{email}\">\n      <label for=\"password\">Password{password_notice}</label>\n      <input type=\"password\" id=\"password\" name=\"password\">\n      <label for=\"remember_me\"><input type=\"checkbox\" id=\"remember_me\" name=\"remember_me\" value=\"true\"> Remember Me</label>\n      <button type=\"submit\">Log In</button>\n    </form>\n",
        action = escape(&action),
        email = escape(email),
        email_notice = field_notice(errors, "email"),
        password_notice = field_notice(errors, "password"),
    );
    layout("Log In", false, messages, &body)
}

pub fn profile_page(messages: &[Message], email: &str, member_since: &str) -> Html<String> {
    let body = format!(
        "    <h2>User Profile</h2>\n    <p>Email: {email}</p>\n    <p>Member since: {member_since}</p>\n",
        email = escape(email),
        member_since = escape(member_since),
    );
    layout("Profile", true, messages, &body)
}

pub fn add_stock_page(
    messages: &[Message],
    symbol: &str,
    shares: &str,
    price: &str,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        "    <h2>Add a Stock</h2>\n    <form method=\"post\" action=\"/add_stock\">\n      <label for=\"stock_symbol\">Stock Symbol <em>(required)</em>{symbol_notice}</label>\n      <input type=\"text\" id=\"stock_symbol\" name=\"stock_symbol\" value=\"{symbol}\">\n      <label for=\"number_of_shares\">Number of Shares <em>(required)</em>{shares_notice}</label>\n      <input type=\"text\" id=\"number_of_shares\" name=\"number_of_shares\" value=\"{shares}\">\n      <label for=\"purchase_price\">Purchase Price ($) <em>(required)</em>{price_notice}</label>\n      <input type=\"text\" id=\"purchase_price\" name=\"purchase_price\" value=\"{price}\">\n      <button type=\"submit\">Add</button>\n    </form>\n",
        symbol = escape(symbol),
        shares = escape(shares),
        price = escape(price),
        symbol_notice = field_notice(errors, "stock_symbol"),
        shares_notice = field_notice(errors, "number_of_shares"),
        price_notice = field_notice(errors, "purchase_price"),
    );
    layout("Add a Stock", true, messages, &body)
}

pub fn stocks_page(messages: &[Message], stocks: &[Stock]) -> Html<String> {
    let rows: String = stocks
        .iter()
        .map(|s| {
            format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&s.stock_symbol),
                s.number_of_shares,
                dollars(s.purchase_price),
            )
        })
        .collect();
    let table = if stocks.is_empty() {
        "    <p>No stocks have been added yet.</p>\n".to_string()
    } else {
        format!(
            "    <table>\n      <thead>\n        <tr><th>Stock Symbol</th><th>Number of Shares</th><th>Purchase Price</th></tr>\n      </thead>\n      <tbody>\n{rows}      </tbody>\n    </table>\n"
        )
    };
    let body = format!("    <h2>List of Stocks</h2>\n{table}");
    layout("Stocks", true, messages, &body)
}

pub fn forbidden_page() -> Html<String> {
    layout(
        "Forbidden",
        false,
        &[],
        "    <h2>Forbidden (403)</h2>\n    <p>You do not have permission to view this page.</p>\n",
    )
}

pub fn not_found_page() -> Html<String> {
    layout(
        "Not Found",
        false,
        &[],
        "    <h2>Page Not Found (404)</h2>\n    <p>That page does not exist. <a href=\"/\">Return home.</a></p>\n",
    )
}

pub fn method_not_allowed_page() -> Html<String> {
    layout(
        "Method Not Allowed",
        false,
        &[],
        "    <h2>Method Not Allowed (405)</h2>\n    <p>That method is not supported for this page.</p>\n",
    )
}

pub fn bad_request_page() -> Html<String> {
    layout(
        "Bad Request",
        false,
        &[],
        "    <h2>Bad Request (400)</h2>\n    <p>The request could not be processed.</p>\n",
    )
}

pub fn server_error_page() -> Html<String> {
    layout(
        "Server Error",
        false,
        &[],
        "    <h2>Server Error (500)</h2>\n    <p>Something went wrong on our side.</p>\n",
    )
}
