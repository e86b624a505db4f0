//! HTML for the fixture pages. The markup mirrors the selectors in
//! `demoaut_common::site`.

use demoaut_common::{
    catalog::{ResultOrder, Vehicle},
    price::format_brl,
    site, ReservationField,
};
use rocket::response::content::RawHtml;

const PICKUP_TIMES: &[&str] = &[
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00",
];

const SEARCH_SCRIPT: &str = r#"
<script>
  const input = document.querySelector('input[placeholder="Pesquisar"]');
  const go = () => { location.href = '/caf/busca?q=' + encodeURIComponent(input.value); };
  document.querySelector('button.search-button').addEventListener('click', go);
  input.addEventListener('keydown', (event) => { if (event.key === 'Enter') go(); });
</script>"#;

const RESERVATION_SCRIPT: &str = r#"
<script>
  const form = document.querySelector('form.reservation-form');
  const confirmation = document.querySelector('.reservation-confirmation');
  let submitted = false;

  function validate() {
    let missing = 0;
    for (const field of form.querySelectorAll('input, select')) {
      const slot = form.querySelector(`.error-slot[data-for="${field.name}"]`);
      slot.replaceChildren();
      if (!field.value.trim()) {
        missing += 1;
        const message = document.createElement('span');
        message.className = 'error-message';
        message.textContent = 'Campo obrigatório';
        slot.append(message);
      }
    }
    return missing === 0;
  }

  form.addEventListener('submit', (event) => {
    event.preventDefault();
    submitted = true;
    confirmation.hidden = !validate();
  });
  form.addEventListener('input', () => { if (submitted) validate(); });
  form.addEventListener('change', () => { if (submitted) validate(); });
</script>"#;

fn layout(title: &str, body: &str) -> RawHtml<String> {
    RawHtml(format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - DemoAut</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

fn search_bar(query: &str) -> String {
    format!(
        "<div class=\"search-bar\">\
         <input type=\"search\" placeholder=\"Pesquisar\" value=\"{}\">\
         <button type=\"button\" class=\"search-button\">Buscar</button>\
         </div>{}",
        escape(query),
        SEARCH_SCRIPT
    )
}

pub fn home() -> RawHtml<String> {
    layout(
        "Aluguel de Carros",
        &format!("<h1>Aluguel de Carros</h1>\n{}", search_bar("")),
    )
}

pub fn results(query: &str, order: ResultOrder, vehicles: &[&Vehicle]) -> RawHtml<String> {
    let lowest_first = uri!(crate::busca(q = Some(query), ordem = Some(site::LOWEST_PRICE_ORDER)));
    let ordem = match order {
        ResultOrder::Relevance => "relevancia",
        ResultOrder::LowestPrice => site::LOWEST_PRICE_ORDER,
    };

    let mut body = format!(
        "{}\n\
         <button type=\"button\" class=\"filters-toggle\" \
         onclick=\"document.querySelector('.filters-panel').hidden = false\">Filtros</button>\n\
         <div class=\"filters-panel\" hidden>\
         <button type=\"button\" \
         onclick=\"document.querySelector('.price-options').hidden = false\">Preço</button>\
         <div class=\"price-options\" hidden><a href=\"{}\">Menor Preço</a></div>\
         </div>\n\
         <div class=\"search-results\" data-ordem=\"{}\">\n",
        search_bar(query),
        escape(&lowest_first.to_string()),
        ordem
    );
    for vehicle in vehicles {
        body.push_str(&format!(
            "<a class=\"search-result-item\" href=\"{}\">\
             <span class=\"vehicle-name\">{}</span> \
             <span class=\"vehicle-group\">{}</span> \
             <span class=\"price-value\">{}</span></a>\n",
            uri!(crate::veiculo(vehicle.id)),
            escape(vehicle.name),
            escape(vehicle.group),
            format_brl(vehicle.daily_price)
        ));
    }
    if vehicles.is_empty() {
        body.push_str("<p class=\"no-results\">Nenhum veículo encontrado</p>\n");
    }
    body.push_str("</div>");

    layout("Resultados", &body)
}

pub fn vehicle(vehicle: &Vehicle) -> RawHtml<String> {
    let specs: String = vehicle
        .specs
        .iter()
        .map(|spec| format!("<li>{}</li>", escape(spec)))
        .collect();
    let availability = if vehicle.available {
        "Disponível"
    } else {
        "Indisponível no momento"
    };

    let body = format!(
        "<section class=\"vehicle-details\">\n\
         <h1>{}</h1>\n<p>{}</p>\n\
         <ul class=\"vehicle-specs\">{}</ul>\n\
         <p class=\"rental-price\">Diária: <span class=\"price-value\">{}</span></p>\n\
         <p class=\"availability\">{}</p>\n\
         <button type=\"button\" onclick=\"location.href = '{}'\">Reservar</button>\n\
         </section>",
        escape(vehicle.name),
        escape(vehicle.group),
        specs,
        format_brl(vehicle.daily_price),
        availability,
        uri!(crate::reserva(vehicle.id)),
    );

    layout(vehicle.name, &body)
}

pub fn reservation(vehicle: &Vehicle) -> RawHtml<String> {
    let mut fields = String::new();
    for field in ReservationField::ALL {
        let label = match field {
            ReservationField::PickupLocation => "Local de retirada",
            ReservationField::PickupDate => "Data de retirada",
            ReservationField::PickupTime => "Hora de retirada",
            ReservationField::ReturnDate => "Data de devolução",
            ReservationField::ReturnTime => "Hora de devolução",
        };
        let control = if field.is_select() {
            let options: String = PICKUP_TIMES
                .iter()
                .map(|time| format!("<option value=\"{0}\">{0}</option>", time))
                .collect();
            format!(
                "<select name=\"{}\"><option value=\"\">--:--</option>{}</select>",
                field.name(),
                options
            )
        } else if field == ReservationField::PickupLocation {
            format!("<input type=\"text\" name=\"{}\">", field.name())
        } else {
            format!("<input type=\"date\" name=\"{}\">", field.name())
        };
        fields.push_str(&format!(
            "<label>{} {}</label><span class=\"error-slot\" data-for=\"{}\"></span>\n",
            label,
            control,
            field.name()
        ));
    }

    let body = format!(
        "<h1>Reserva</h1>\n<p>{}</p>\n\
         <form class=\"reservation-form\" novalidate>\n{}\
         <button type=\"submit\">Confirmar reserva</button>\n</form>\n\
         <p class=\"reservation-confirmation\" hidden>Reserva registrada</p>{}",
        escape(vehicle.name),
        fields,
        RESERVATION_SCRIPT
    );

    layout("Reserva", &body)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
