use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    error::AppResult,
    flash::Flash,
    state::AppState,
    stocks::{forms::StockForm, repo},
    users::extractors::{MaybeUser, RequireUser},
    views,
};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
}

pub fn portfolio_routes() -> Router<AppState> {
    Router::new()
        .route("/add_stock", get(add_stock_form).post(add_stock_submit))
        .route("/stocks/", get(list_stocks))
}

async fn index(identity: MaybeUser, jar: CookieJar) -> Response {
    let (jar, messages) = Flash::read(&jar).take(jar);
    (jar, views::index_page(identity.0.is_some(), &messages)).into_response()
}

async fn about(identity: MaybeUser, jar: CookieJar) -> Response {
    // Raised and rendered in the same response.
    let mut flash = Flash::read(&jar);
    flash.info("Thanks for learning about this site!");
    let (jar, messages) = flash.take(jar);
    (jar, views::about_page(identity.0.is_some(), &messages)).into_response()
}

async fn add_stock_form(RequireUser(_session): RequireUser, jar: CookieJar) -> Response {
    let (jar, messages) = Flash::read(&jar).take(jar);
    (jar, views::add_stock_page(&messages, "", "", "", &[])).into_response()
}

#[instrument(skip(state, session, jar, form))]
async fn add_stock_submit(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: CookieJar,
    Form(form): Form<StockForm>,
) -> AppResult<Response> {
    match form.validate() {
        Ok(new_stock) => {
            let stock = repo::insert(&state.db, session.user_id, &new_stock).await?;
            info!(
                user_id = %session.user_id,
                symbol = %stock.stock_symbol,
                shares = stock.number_of_shares,
                "added new stock"
            );
            let mut flash = Flash::read(&jar);
            flash.success(format!("Added new stock ({})!", stock.stock_symbol));
            Ok(flash.redirect(jar, "/stocks/"))
        }
        Err(errors) => {
            let (jar, messages) = Flash::read(&jar).take(jar);
            Ok((
                jar,
                views::add_stock_page(
                    &messages,
                    &form.stock_symbol,
                    &form.number_of_shares,
                    &form.purchase_price,
                    &errors,
                ),
            )
                .into_response())
        }
    }
}

#[instrument(skip(state, session, jar))]
async fn list_stocks(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let stocks = repo::list_for_user(&state.db, session.user_id).await?;
    let (jar, messages) = Flash::read(&jar).take(jar);
    Ok((jar, views::stocks_page(&messages, &stocks)).into_response())
}
