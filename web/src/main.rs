#[macro_use]
extern crate rocket;

mod pages;

use demoaut_common::{
    catalog::{self, ResultOrder},
    site,
};
use rocket::response::{content::RawHtml, Redirect};

#[get("/")]
fn index() -> Redirect {
    Redirect::to(site::HOME_PATH)
}

#[get("/caf")]
fn home() -> RawHtml<String> {
    pages::home()
}

#[get("/caf/busca?<q>&<ordem>")]
fn busca(q: Option<String>, ordem: Option<String>) -> RawHtml<String> {
    let query = q.unwrap_or_default();
    let order = ResultOrder::from_param(ordem.as_deref());
    pages::results(&query, order, &catalog::search(&query, order))
}

#[get("/caf/veiculo/<id>")]
fn veiculo(id: u32) -> Option<RawHtml<String>> {
    catalog::find(id).map(pages::vehicle)
}

#[get("/caf/reserva/<id>")]
fn reserva(id: u32) -> Option<RawHtml<String>> {
    catalog::find(id).map(pages::reservation)
}

#[launch]
fn rocket() -> _ {
    rocket::build().mount("/", routes![index, home, busca, veiculo, reserva])
}
