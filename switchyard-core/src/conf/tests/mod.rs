#[cfg(test)]
mod loader_tests;

#[cfg(test)]
pub(crate) const SAMPLE: &str = r#"
server = {
  version = 1
}

active_pool = "blue"

pools = {
  blue = {
    host       = "app_blue"
    port       = 3000
    release_id = "blue-v1"
  }
  green = {
    host       = "app_green"
    port       = 3000
    release_id = "green-v1"
  }
}

proxy = {
  config_path = "/etc/nginx/nginx.conf"
  pid_file    = "/run/nginx.pid"
  listen      = 8080
}
"#;
