mod boxed;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        mod tcpstream;

        #[cfg(unix)]
        mod unixstream;
    }
}
