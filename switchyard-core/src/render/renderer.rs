use crate::conf::RuntimeConfig;
use crate::conf::types::{HeadersConfig, ProxyConfig};
use crate::failover::FailoverPolicy;
use crate::failover::secs;
use crate::pool::{Pool, PoolLabel, PoolRegistry};
use crate::render::inspect::MARKER_PREFIX;
use crate::render::writer::ConfWriter;
use crate::render::RenderedConfig;

const NO_ARGS: [&str; 0] = [];

/// Turns a pool selection into nginx configuration text.
///
/// Rendering is pure: the same selection, registry, and settings always
/// produce byte-identical output.
#[derive(Debug, Clone)]
pub struct Renderer {
    proxy: ProxyConfig,
    failover: FailoverPolicy,
    headers: HeadersConfig,
    health_path: String,
}

impl Renderer {
    pub fn new(
        proxy: ProxyConfig,
        failover: FailoverPolicy,
        headers: HeadersConfig,
        health_path: impl Into<String>,
    ) -> Self {
        Self {
            proxy,
            failover,
            headers,
            health_path: health_path.into(),
        }
    }

    pub fn from_config(cfg: &RuntimeConfig) -> Self {
        Self::new(
            cfg.proxy.clone(),
            cfg.failover.clone(),
            cfg.headers.clone(),
            cfg.health_path.clone(),
        )
    }

    pub fn render(&self, active: PoolLabel, registry: &PoolRegistry) -> RenderedConfig {
        let primary = registry.get(active).clone();
        let backup = registry.get(active.other()).clone();
        let text = self.write(&primary, &backup);
        RenderedConfig::new(primary, backup, text)
    }

    fn write(&self, primary: &Pool, backup: &Pool) -> String {
        let proxy = &self.proxy;
        let mut w = ConfWriter::new();

        w.comment(&format!(
            "{} active_pool={} primary={} backup={}",
            MARKER_PREFIX.trim_start_matches("# "),
            primary.label,
            primary.address(),
            backup.address()
        ));
        w.comment("Generated file. Changes are overwritten on the next switch.");
        w.blank();

        w.directive("worker_processes", [proxy.worker_processes.as_str()]);
        w.directive("pid", [proxy.pid_file.display().to_string()]);
        w.directive("error_log", [proxy.error_log.as_str()]);
        w.blank();

        w.block("events", NO_ARGS, |w| {
            w.directive("worker_connections", [proxy.worker_connections.to_string()]);
        });
        w.blank();

        w.block("http", NO_ARGS, |w| {
            match &proxy.access_log {
                Some(log) => w.directive("access_log", [log.as_str()]),
                None => w.directive("access_log", ["off"]),
            }

            if let Some(dir) = &proxy.runtime_dir {
                let dir = dir.display();
                w.directive("client_body_temp_path", [format!("{dir}/client_body")]);
                w.directive("proxy_temp_path", [format!("{dir}/proxy")]);
                w.directive("fastcgi_temp_path", [format!("{dir}/fastcgi")]);
                w.directive("uwsgi_temp_path", [format!("{dir}/uwsgi")]);
                w.directive("scgi_temp_path", [format!("{dir}/scgi")]);
            }
            w.blank();

            self.write_upstream(w, primary, backup);
            w.blank();
            self.write_server(w);
        });

        w.finish()
    }

    fn write_upstream(&self, w: &mut ConfWriter, primary: &Pool, backup: &Pool) {
        w.block("upstream", [self.proxy.upstream_name.as_str()], |w| {
            let mut primary_args = vec![primary.address()];
            primary_args.extend(self.failover.primary_member_args());
            w.directive("server", primary_args);
            w.directive("server", [backup.address(), "backup".to_string()]);
            w.directive("keepalive", [self.failover.keepalive.to_string()]);
        });
    }

    fn write_server(&self, w: &mut ConfWriter) {
        let failover = &self.failover;
        let headers = &self.headers;
        let upstream = format!("http://{}", self.proxy.upstream_name);

        w.block("server", NO_ARGS, |w| {
            w.directive("listen", [self.proxy.listen.to_string()]);
            w.blank();

            w.directive("proxy_connect_timeout", [secs(failover.connect_timeout)]);
            w.directive("proxy_send_timeout", [secs(failover.send_timeout)]);
            w.directive("proxy_read_timeout", [secs(failover.read_timeout)]);
            w.directive("proxy_next_upstream", failover.next_upstream_args());
            w.directive("proxy_next_upstream_tries", [failover.tries.to_string()]);
            w.directive("proxy_http_version", ["1.1"]);
            w.directive("proxy_set_header", ["Connection", "\"\""]);
            w.directive("proxy_set_header", ["Host", "$host"]);
            w.directive("proxy_set_header", ["X-Real-IP", "$remote_addr"]);
            w.directive(
                "proxy_set_header",
                ["X-Forwarded-For", "$proxy_add_x_forwarded_for"],
            );
            w.directive("proxy_pass_header", [headers.pool.as_str()]);
            w.directive("proxy_pass_header", [headers.release.as_str()]);
            w.directive(
                "add_header",
                [
                    headers.proxy_marker.as_str(),
                    headers.proxy_marker_value.as_str(),
                    "always",
                ],
            );
            w.blank();

            w.block("location", ["=", self.health_path.as_str()], |w| {
                w.directive("proxy_pass", [format!("{upstream}{}", self.health_path)]);
            });
            w.block("location", ["/"], |w| {
                w.directive("proxy_pass", [upstream.as_str()]);
            });
        });
    }
}
