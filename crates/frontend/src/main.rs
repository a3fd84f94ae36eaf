mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;
use momentory_shared::models::PhotoScope;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/myMap")]
    MyMap {},
    #[route("/publicMap")]
    PublicMap {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::map_page::MapPage { scope: PhotoScope::Mine }
    }
}

#[component]
fn MyMap() -> Element {
    let page_key = "mine";
    rsx! {
        pages::map_page::MapPage { key: "{page_key}", scope: PhotoScope::Mine }
    }
}

#[component]
fn PublicMap() -> Element {
    let page_key = "public";
    rsx! {
        pages::map_page::MapPage { key: "{page_key}", scope: PhotoScope::Public }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
