//! Tera sources of the pages, bundled into the binary.

pub const LANDING_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{ title }}</title>
</head>
<body>
  <main>
    <h1>{{ title }}</h1>
    <p>Report diseases where you are and see what others reported nearby.</p>
    <p><a href="{{ map_path }}">Open the map</a></p>
  </main>
</body>
</html>
"#;

pub const MAP_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{ heading }}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="" />
  <style>
    body { margin: 0; font-family: system-ui, sans-serif; }
    #map { height: 100vh; width: 100%; }
  </style>
</head>
<body>
  <div>
    <h2>{{ heading }}</h2>
    <form method="post" action="{{ submit_path }}">
      <label>
        Enter Disease Label:
        <input type="text" name="label" value="{{ label }}" placeholder="Enter disease here" />
      </label>
      <button type="submit">Add Marker</button>
    </form>
{% if ready %}
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
    <script>
      const config = {{ config_json | safe }};
      const map = L.map('map').setView(config.center, config.zoom);
      L.tileLayer(config.tiles.url, { attribution: config.tiles.attribution }).addTo(map);
      const redIcon = L.icon(config.icon);
      for (const pin of config.pins) {
        const text = document.createElement('span');
        text.textContent = pin.popup;
        L.marker(pin.position, { icon: redIcon }).addTo(map).bindPopup(text);
      }
    </script>
{% else %}
    <p>Fetching live location...</p>
{% if locate %}
    <script>
      navigator.geolocation.getCurrentPosition(
        (location) => {
          const { latitude, longitude } = location.coords;
          window.location.replace(`{{ map_path | safe }}?lat=${latitude}&lon=${longitude}`);
        },
        (error) => {
          console.error('Error fetching live location:', error);
          window.location.replace(`{{ map_path | safe }}?error=${encodeURIComponent(error.message)}`);
        }
      );
    </script>
{% endif %}
{% endif %}
  </div>
</body>
</html>
"#;

pub const NOT_FOUND_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Not found</title>
</head>
<body>
  <p>Nothing lives at <code>{{ path }}</code>. <a href="{{ home_path }}">Back home</a></p>
</body>
</html>
"#;
