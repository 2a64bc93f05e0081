mod post_process;
